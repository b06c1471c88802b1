use serde::{Deserialize, Serialize};

/// Maximum title length shown in list output
const MAX_TITLE_DISPLAY_LEN: usize = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    pub id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,
}

impl Post {
    pub fn display_title(&self) -> String {
        if self.title.chars().count() <= MAX_TITLE_DISPLAY_LEN {
            self.title.clone()
        } else {
            let cut: String = self.title.chars().take(MAX_TITLE_DISPLAY_LEN - 3).collect();
            format!("{}...", cut)
        }
    }
}
