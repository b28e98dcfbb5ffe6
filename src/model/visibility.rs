//! 入场观察器：块首次达到可见阈值时一次性标记，之后不再跟踪

use std::collections::BTreeSet;

use crate::model::article::BlockGeometry;

/// 触发入场所需的最小可见比例
pub const ENTRANCE_THRESHOLD: f32 = 0.1;

/// 待观察块的集合。块一旦入场即被移出集合，
/// 即使之后滚出再滚回也不会再收到通知。
#[derive(Debug, Default)]
pub struct EntranceWatcher {
    pending: BTreeSet<usize>,
}

impl EntranceWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册待观察的块
    pub fn observe(&mut self, index: usize) {
        self.pending.insert(index);
    }

    pub fn is_watching(&self, index: usize) -> bool {
        self.pending.contains(&index)
    }

    pub fn watched_count(&self) -> usize {
        self.pending.len()
    }

    /// 对所有待观察块求可见比例；达到阈值的块被移出观察并返回。
    /// 尚未回报几何信息的块跳过，留待布局完成后的下一轮评估。
    pub fn evaluate(
        &mut self,
        geometry: &[Option<BlockGeometry>],
        view_top: f32,
        view_height: f32,
    ) -> Vec<usize> {
        let mut entered = Vec::new();
        for &idx in &self.pending {
            let Some(Some(geo)) = geometry.get(idx) else {
                continue;
            };
            if visible_fraction(geo.top, geo.height, view_top, view_height) >= ENTRANCE_THRESHOLD {
                entered.push(idx);
            }
        }
        for idx in &entered {
            self.pending.remove(idx);
        }
        entered
    }
}

/// 元素与视口的重叠高度占元素自身高度的比例；零高元素视为不可见
pub fn visible_fraction(top: f32, height: f32, view_top: f32, view_height: f32) -> f32 {
    if height <= 0.0 || view_height <= 0.0 {
        return 0.0;
    }
    let bottom = top + height;
    let view_bottom = view_top + view_height;
    let overlap = bottom.min(view_bottom) - top.max(view_top);
    if overlap <= 0.0 {
        0.0
    } else {
        overlap / height
    }
}
