//! 数据模型层：文章内容、偏好存储与各交互控制器的核心状态

pub mod article;
pub mod nav;
pub mod prefs;
pub mod scroll;
pub mod theme;
pub mod visibility;
