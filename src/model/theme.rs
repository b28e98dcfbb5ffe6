//! 主题：深色/浅色两态，缺省深色，经偏好存储持久化

use crate::model::prefs::{PrefStore, THEME_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// 解析持久化值；无法识别的内容回落到深色
    pub fn parse(value: &str) -> Self {
        match value {
            "light" => Theme::Light,
            _ => Theme::Dark,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// 启动时读取初始主题；存储中没有记录时静默使用深色
pub fn initial_theme(store: &PrefStore) -> Theme {
    store.get(THEME_KEY).map(Theme::parse).unwrap_or_default()
}

/// 切换主题并写回存储，返回新值
pub fn toggle_theme(current: Theme, store: &mut PrefStore) -> Theme {
    let next = current.toggled();
    store.set(THEME_KEY, next.as_str());
    tracing::info!("主题已切换: {}", next.as_str());
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_dark() {
        let store = PrefStore::in_memory();
        assert_eq!(initial_theme(&store), Theme::Dark, "无记录时应该缺省深色");
    }

    #[test]
    fn test_parse_tolerates_garbage() {
        assert_eq!(Theme::parse("light"), Theme::Light);
        assert_eq!(Theme::parse("dark"), Theme::Dark);
        assert_eq!(Theme::parse("blue"), Theme::Dark, "未知值应该回落到深色");
        assert_eq!(Theme::parse(""), Theme::Dark);
    }

    #[test]
    fn test_toggle_parity() {
        // 从深色出发连续切换n次：偶数次回到dark，奇数次停在light
        for n in 0..6 {
            let mut store = PrefStore::in_memory();
            let mut current = Theme::Dark;
            for _ in 0..n {
                current = toggle_theme(current, &mut store);
            }
            if n == 0 {
                assert_eq!(store.get(THEME_KEY), None, "未切换时不应写入存储");
            } else if n % 2 == 1 {
                assert_eq!(store.get(THEME_KEY), Some("light"), "奇数次切换后应存light");
            } else {
                assert_eq!(store.get(THEME_KEY), Some("dark"), "偶数次切换后应存dark");
            }
            assert_eq!(current, if n % 2 == 0 { Theme::Dark } else { Theme::Light });
        }
    }

    #[test]
    fn test_toggle_round_trip_through_store() {
        let mut store = PrefStore::in_memory();
        let next = toggle_theme(Theme::Dark, &mut store);
        assert_eq!(next, Theme::Light);
        assert_eq!(initial_theme(&store), Theme::Light, "切换结果应该能从存储读回");
    }
}
