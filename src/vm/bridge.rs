//! VM桥接层：连接Slint UI与ReaderState数据模型
//!
//! 注意：此模块的具体实现在main.rs中，因为依赖于Slint生成的类型
//! 这里只提供公共常量

// === 常量定义（消除魔法值） ===
pub const STATUS_READY: &str = "就绪";
pub const STATUS_LOADING: &str = "正在加载文章...";
pub const STATUS_LOADED: &str = "文章加载完成";
pub const STATUS_COPIED: &str = "已复制代码";
pub const STATUS_NO_FILE: &str = "未选择文件";
pub const STATUS_ERROR_PREFIX: &str = "错误: ";

// === 纯装饰性的延迟回退，到点即复位，快速连续触发时后到的定时器直接覆盖 ===
/// 主题图标旋转动画的复位延迟
pub const SPIN_REVERT_MS: u64 = 300;
/// 复制确认态（对勾）的回退延迟
pub const COPY_REVERT_MS: u64 = 2000;
