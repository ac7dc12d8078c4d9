//! NavigationDirection - Transition direction carried with a navigation intent

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NavigationDirection {
    #[default]
    Forward,
    Back,
}
