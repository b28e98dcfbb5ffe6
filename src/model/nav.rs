//! 导航抽屉状态：开合、滚动锁定与断点自动收起

/// 宽度超过该断点时视为桌面布局，抽屉强制收起
pub const DESKTOP_BREAKPOINT: f32 = 768.0;

/// 抽屉开合的唯一事实来源。UI上的触发按钮与面板各持一份
/// 标记，由桥接层在每次变化后同步，保证两者永远一致。
#[derive(Debug, Default)]
pub struct NavState {
    open: bool,
}

impl NavState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// 滚动锁定与抽屉开合严格同步
    pub fn scroll_locked(&self) -> bool {
        self.open
    }

    /// 开合翻转，返回新状态
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// 收起抽屉；已收起时重复调用无副作用
    pub fn close(&mut self) {
        self.open = false;
    }

    /// 视口宽度越过断点时强制收起，返回是否真的发生了收起
    pub fn on_viewport_resized(&mut self, width: f32) -> bool {
        if width > DESKTOP_BREAKPOINT && self.open {
            self.open = false;
            true
        } else {
            false
        }
    }
}
