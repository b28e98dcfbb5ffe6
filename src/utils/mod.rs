//! 通用工具：剪贴板与JSON文件IO

pub mod clipboard;
pub mod fs;
