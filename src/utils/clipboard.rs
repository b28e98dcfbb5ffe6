//! Clipboard  cross-platform clipboard helpers

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("clipboard error: {0}")]
    Clip(String),
}

/// 剪贴板写入口。抽成trait是为了能在测试中注入失败的实现，
/// 验证复制失败只留下日志、不改动按钮状态。
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// 系统剪贴板（copypasta后端），每次写入时新建上下文
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        use copypasta::{ClipboardContext, ClipboardProvider};
        let mut ctx = ClipboardContext::new().map_err(|e| ClipboardError::Clip(e.to_string()))?;
        ctx.set_contents(text.to_string())
            .map_err(|e| ClipboardError::Clip(e.to_string()))
    }
}

/// 复制代码块文本。失败只记录日志；调用方据返回值决定是否展示确认态。
pub fn copy_block_text(clipboard: &mut dyn Clipboard, text: &str) -> bool {
    match clipboard.write_text(text) {
        Ok(()) => {
            tracing::info!("代码已复制到剪贴板，长度: {} 字符", text.chars().count());
            true
        }
        Err(e) => {
            tracing::error!("复制失败: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 记录写入内容的假剪贴板，可配置为失败
    #[derive(Default)]
    struct FakeClipboard {
        contents: Option<String>,
        fail: bool,
    }

    impl Clipboard for FakeClipboard {
        fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            if self.fail {
                return Err(ClipboardError::Clip("权限被拒绝".to_string()));
            }
            self.contents = Some(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_copy_puts_exact_text_on_clipboard() {
        let mut clipboard = FakeClipboard::default();

        assert!(copy_block_text(&mut clipboard, "print(1)"), "复制应该成功");
        assert_eq!(
            clipboard.contents.as_deref(),
            Some("print(1)"),
            "剪贴板内容应该与代码块原文一致"
        );
    }

    #[test]
    fn test_failed_copy_reports_false_and_writes_nothing() {
        let mut clipboard = FakeClipboard {
            fail: true,
            ..FakeClipboard::default()
        };

        assert!(!copy_block_text(&mut clipboard, "print(1)"), "失败应该返回false");
        assert_eq!(clipboard.contents, None, "失败时不应留下任何内容");
    }

    #[test]
    fn test_copy_empty_text() {
        let mut clipboard = FakeClipboard::default();
        assert!(copy_block_text(&mut clipboard, ""), "复制空字符串应该成功");
        assert_eq!(clipboard.contents.as_deref(), Some(""));
    }

    #[test]
    fn test_copy_unicode_text() {
        let mut clipboard = FakeClipboard::default();
        let code = "println!(\"你好，世界 ✨\");";
        assert!(copy_block_text(&mut clipboard, code));
        assert_eq!(clipboard.contents.as_deref(), Some(code), "Unicode内容应该原样写入");
    }
}
