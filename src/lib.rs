//! 博文阅读器库
//!
//! 提供文章加载与展平、主题与导航状态、滚动与入场计算以及代码复制支持
//! 遵循MVVM架构模式，UI层通过桥接回调驱动这里的核心状态

pub mod model;
pub mod utils;
pub mod vm;

// 重新导出主要类型
pub use model::article::{AppError, ArticleDoc, BlockKind, ContentBlock, ReaderState};
pub use model::prefs::PrefStore;
pub use model::theme::Theme;
