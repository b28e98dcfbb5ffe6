//! 滚动计算：锚点偏移与顶栏阴影，纯函数便于测试

/// 锚点定位时在固定顶栏下方预留的间距
pub const ANCHOR_MARGIN: f32 = 20.0;

/// 目标块顶边换算为滚动偏移：顶边减去顶栏高度再留出间距
pub fn anchor_offset(target_top: f32, header_height: f32) -> f32 {
    target_top - header_height - ANCHOR_MARGIN
}

/// 顶栏阴影开关：停在页顶（含回弹产生的负偏移）时清除
pub fn header_shadow(offset: f32) -> bool {
    offset > 0.0
}

/// 解析页内锚点："#intro" 给出 "intro"；裸 "#" 占位符不触发跳转
pub fn parse_anchor(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_offset_accounts_for_header() {
        // 目标顶边500，顶栏60：500 - 60 - 20 = 420
        assert_eq!(anchor_offset(500.0, 60.0), 420.0);
    }

    #[test]
    fn test_anchor_offset_near_top_can_go_negative() {
        // 紧贴页顶的目标算出负偏移，由滚动容器自行夹取
        assert_eq!(anchor_offset(30.0, 60.0), -50.0);
    }

    #[test]
    fn test_header_shadow_cleared_at_top() {
        assert!(!header_shadow(0.0), "页顶不应有阴影");
        assert!(!header_shadow(-12.0), "回弹的负偏移同样视为页顶");
        assert!(header_shadow(1.0), "离开页顶即出现阴影");
        assert!(header_shadow(800.0));
    }

    #[test]
    fn test_parse_anchor() {
        assert_eq!(parse_anchor("#intro"), Some("intro"));
        assert_eq!(parse_anchor("#"), None, "裸#占位符不应触发跳转");
        assert_eq!(parse_anchor("intro"), None, "没有#前缀的不是页内锚点");
        assert_eq!(parse_anchor(""), None);
    }
}
