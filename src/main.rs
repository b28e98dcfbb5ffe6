//! 程序入口：初始化日志、加载 Slint UI，并绑定各阅读体验控制器

use std::{cell::RefCell, path::PathBuf, rc::Rc, time::Duration};

use slint::{ComponentHandle, Model, ModelRc, VecModel};
use tracing_subscriber::fmt::SubscriberBuilder;

slint::include_modules!();

mod model;
mod utils;
mod vm;

use model::article::{BlockKind, ContentBlock, ReaderState};
use model::prefs::PrefStore;
use model::theme::{self, Theme};
use model::{nav, scroll};
use utils::clipboard::{copy_block_text, SystemClipboard};
use vm::bridge::*;

// BlockData转换实现
impl From<&ContentBlock> for BlockData {
    /// 将Rust内容块转换为Slint可用的数据结构
    fn from(block: &ContentBlock) -> Self {
        Self {
            kind: match block.kind {
                BlockKind::Heading => "heading",
                BlockKind::Para => "para",
                BlockKind::Code => "code",
            }
            .into(),
            text: block.text.clone().into(),
            lang: block.lang.clone().into(),
            entered: block.entered,
            confirmed: block.confirmed,
        }
    }
}

/// VM桥接器：管理UI与阅读器状态的交互
struct ViewModelBridge {
    state: Rc<RefCell<ReaderState>>,
    prefs: Rc<RefCell<PrefStore>>,
}

impl ViewModelBridge {
    /// 创建新的VM桥接器并绑定所有回调
    fn new(
        app_window: &AppWindow,
        state: Rc<RefCell<ReaderState>>,
        prefs: Rc<RefCell<PrefStore>>,
    ) -> Self {
        let bridge = Self { state, prefs };
        bridge.setup_callbacks(app_window);
        bridge
    }

    /// 设置所有UI回调函数
    fn setup_callbacks(&self, app_window: &AppWindow) {
        let state = self.state.clone();
        let prefs = self.prefs.clone();

        // === 主题切换回调 ===
        {
            let prefs = prefs.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_toggle_theme(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_toggle_theme(&app_window, &prefs);
                }
            });
        }

        // === 导航抽屉开合回调 ===
        {
            let state = state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_toggle_menu(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_toggle_menu(&app_window, &state);
                }
            });
        }

        // === 抽屉链接点击回调（收起抽屉并跳转） ===
        {
            let state = state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_nav_link_clicked(move |target| {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_nav_link_clicked(&app_window, &state, &target);
                }
            });
        }

        // === 页内锚点点击回调 ===
        {
            let state = state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_anchor_clicked(move |target| {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_anchor_clicked(&app_window, &state, &target);
                }
            });
        }

        // === 视口尺寸变化回调 ===
        {
            let state = state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_viewport_resized(move |width| {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_viewport_resized(&app_window, &state, width);
                }
            });
        }

        // === 文章滚动回调（每次滚动都会触发，不做节流） ===
        {
            let state = state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_article_scrolled(move |offset, view_height| {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_article_scrolled(&app_window, &state, offset, view_height);
                }
            });
        }

        // === 块布局回报回调 ===
        {
            let state = state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_block_laid_out(move |idx, top, height| {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_block_laid_out(&app_window, &state, idx, top, height);
                }
            });
        }

        // === 代码复制回调 ===
        {
            let state = state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_copy_code(move |idx| {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_copy_code(&app_window, &state, idx);
                }
            });
        }

        // === 打开文章回调 ===
        {
            let state = state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_open_article(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_open_article(&app_window, &state);
                }
            });
        }
    }

    /// 初始化UI状态
    fn initialize_ui(&self, app_window: &AppWindow) {
        // 启动主题：读取偏好，缺省深色
        let initial = theme::initial_theme(&self.prefs.borrow());
        app_window.set_active_theme(initial.as_str().into());
        app_window.set_status_message(STATUS_READY.into());

        // 打开文件前先展示内置示例文章
        self.state.borrow_mut().load_sample();
        Self::install_article(app_window, &self.state);

        tracing::info!("UI初始化完成，主题: {}", initial.as_str());
    }

    /// 显示文件选择对话框
    fn show_file_dialog() -> Option<PathBuf> {
        use rfd::FileDialog;

        let file_path = FileDialog::new()
            .add_filter("文章JSON", &["json"])
            .add_filter("所有文件", &["*"])
            .set_title("选择要阅读的文章")
            .pick_file();

        match file_path {
            Some(path) => {
                tracing::info!("用户选择了文件: {}", path.display());
                Some(path)
            }
            None => {
                tracing::info!("用户取消了文件选择");
                None
            }
        }
    }

    /// 处理主题切换：翻转窗口根属性并写回偏好存储
    fn handle_toggle_theme(app_window: &AppWindow, prefs: &Rc<RefCell<PrefStore>>) {
        let current = Theme::parse(&app_window.get_active_theme());
        let next = theme::toggle_theme(current, &mut prefs.borrow_mut());
        app_window.set_active_theme(next.as_str().into());

        // 图标旋转动画，到点自动复位
        app_window.set_theme_spin(true);
        let app_window_weak = app_window.as_weak();
        slint::Timer::single_shot(Duration::from_millis(SPIN_REVERT_MS), move || {
            if let Some(app_window) = app_window_weak.upgrade() {
                app_window.set_theme_spin(false);
            }
        });
    }

    /// 处理抽屉开合
    fn handle_toggle_menu(app_window: &AppWindow, state: &Rc<RefCell<ReaderState>>) {
        let open = state.borrow_mut().nav.toggle();
        Self::sync_nav_markers(app_window, state);
        tracing::info!("导航抽屉{}", if open { "已打开" } else { "已收起" });
    }

    /// 处理抽屉链接点击：先收起抽屉（重复收起无害），再执行锚点跳转
    fn handle_nav_link_clicked(
        app_window: &AppWindow,
        state: &Rc<RefCell<ReaderState>>,
        target: &str,
    ) {
        state.borrow_mut().nav.close();
        Self::sync_nav_markers(app_window, state);
        Self::handle_anchor_clicked(app_window, state, target);
    }

    /// 处理页内锚点点击：目标存在时平滑滚动过去，不存在时不做任何事
    fn handle_anchor_clicked(
        app_window: &AppWindow,
        state: &Rc<RefCell<ReaderState>>,
        href: &str,
    ) {
        let Some(anchor) = scroll::parse_anchor(href) else {
            return;
        };

        let target_top = state.borrow().anchor_top(anchor);
        match target_top {
            Some(top) => {
                let offset = scroll::anchor_offset(top, app_window.get_header_height());
                app_window.invoke_scroll_article_to(offset);
                tracing::info!("锚点跳转: #{} -> 偏移 {:.1}", anchor, offset);
            }
            None => {
                tracing::warn!("锚点目标不存在，忽略跳转: #{}", anchor);
            }
        }
    }

    /// 处理视口尺寸变化：宽度越过断点时无条件回到收起状态
    fn handle_viewport_resized(
        app_window: &AppWindow,
        state: &Rc<RefCell<ReaderState>>,
        width: f32,
    ) {
        let closed = state.borrow_mut().nav.on_viewport_resized(width);
        if width > nav::DESKTOP_BREAKPOINT {
            Self::sync_nav_markers(app_window, state);
        }
        if closed {
            tracing::info!("视口变宽至{:.0}，自动收起导航抽屉", width);
        }
    }

    /// 处理文章滚动：更新顶栏阴影并评估入场动画
    fn handle_article_scrolled(
        app_window: &AppWindow,
        state: &Rc<RefCell<ReaderState>>,
        offset: f32,
        view_height: f32,
    ) {
        app_window.set_header_elevated(scroll::header_shadow(offset));

        let entered = {
            let mut state = state.borrow_mut();
            state.last_scroll = offset;
            state.viewport_height = view_height;
            state.evaluate_entrances()
        };
        if !entered.is_empty() {
            Self::update_block_rows(app_window, state, &entered);
        }
    }

    /// 处理块布局回报：记录几何信息后立刻评估一次入场
    fn handle_block_laid_out(
        app_window: &AppWindow,
        state: &Rc<RefCell<ReaderState>>,
        idx: i32,
        top: f32,
        height: f32,
    ) {
        if idx < 0 {
            return;
        }
        let entered = {
            let mut state = state.borrow_mut();
            if !state.set_block_geometry(idx as usize, top, height) {
                return;
            }
            state.evaluate_entrances()
        };
        if !entered.is_empty() {
            Self::update_block_rows(app_window, state, &entered);
        }
    }

    /// 处理复制按钮：写入剪贴板，成功后短暂展示对勾
    fn handle_copy_code(app_window: &AppWindow, state: &Rc<RefCell<ReaderState>>, idx: i32) {
        if idx < 0 {
            return;
        }
        let idx = idx as usize;

        let Some(text) = state.borrow().block_text(idx).map(str::to_string) else {
            return;
        };

        let mut clipboard = SystemClipboard::default();
        if !copy_block_text(&mut clipboard, &text) {
            // 失败已记录日志，按钮保持原样
            return;
        }

        if state.borrow_mut().set_confirmed(idx, true) {
            Self::update_block_rows(app_window, state, &[idx]);
            app_window.set_status_message(STATUS_COPIED.into());

            // 确认态到点回退；快速连点时沿用先到先回退的行为
            let app_window_weak = app_window.as_weak();
            let state = state.clone();
            slint::Timer::single_shot(Duration::from_millis(COPY_REVERT_MS), move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    if state.borrow_mut().set_confirmed(idx, false) {
                        Self::update_block_rows(&app_window, &state, &[idx]);
                    }
                }
            });
        }
    }

    /// 处理打开文章操作
    fn handle_open_article(app_window: &AppWindow, state: &Rc<RefCell<ReaderState>>) {
        let Some(path) = Self::show_file_dialog() else {
            app_window.set_status_message(STATUS_NO_FILE.into());
            return;
        };

        app_window.set_status_message(STATUS_LOADING.into());

        let load_result = state.borrow_mut().load_file(&path);
        match load_result {
            Ok(()) => {
                Self::install_article(app_window, state);
                app_window.set_status_message(STATUS_LOADED.into());
                tracing::info!("文章加载成功: {}", path.display());
            }
            Err(e) => {
                let error_msg = format!("{}{}", STATUS_ERROR_PREFIX, e);
                app_window.set_status_message(error_msg.into());
                tracing::error!("文章加载失败: {}", e);
            }
        }
    }

    /// 将当前文章装入UI：标题、导航链接、内容块，并复位滚动与抽屉
    fn install_article(app_window: &AppWindow, state: &Rc<RefCell<ReaderState>>) {
        let (title, links) = {
            let state = state.borrow();
            let title = state
                .doc
                .as_ref()
                .map(|doc| doc.title.clone())
                .unwrap_or_default();
            (title, state.nav_links())
        };

        app_window.set_article_title(title.into());

        let link_data: Vec<NavLinkData> = links
            .into_iter()
            .map(|(label, target)| NavLinkData {
                label: label.into(),
                target: target.into(),
            })
            .collect();
        app_window.set_nav_links(ModelRc::new(VecModel::from(link_data)));

        Self::refresh_blocks(app_window, state);

        state.borrow_mut().nav.close();
        Self::sync_nav_markers(app_window, state);
        app_window.set_header_elevated(false);
        app_window.invoke_scroll_article_to(0.0);
    }

    /// 把导航状态同步到UI上的两份标记与滚动锁定
    fn sync_nav_markers(app_window: &AppWindow, state: &Rc<RefCell<ReaderState>>) {
        let state = state.borrow();
        app_window.set_menu_button_active(state.nav.is_open());
        app_window.set_menu_panel_active(state.nav.is_open());
        app_window.set_scroll_locked(state.nav.scroll_locked());
    }

    /// 重建内容块模型（仅在装入文章时整体重建）
    fn refresh_blocks(app_window: &AppWindow, state: &Rc<RefCell<ReaderState>>) {
        let block_data: Vec<BlockData> = state.borrow().blocks.iter().map(BlockData::from).collect();
        app_window.set_blocks(ModelRc::new(VecModel::from(block_data)));
    }

    /// 按行更新内容块模型，保持元素实例与动画状态不被重建
    fn update_block_rows(app_window: &AppWindow, state: &Rc<RefCell<ReaderState>>, rows: &[usize]) {
        let updates: Vec<(usize, BlockData)> = {
            let state = state.borrow();
            rows.iter()
                .filter_map(|&idx| state.blocks.get(idx).map(|b| (idx, BlockData::from(b))))
                .collect()
        };

        let model = app_window.get_blocks();
        let Some(vec_model) = model.as_any().downcast_ref::<VecModel<BlockData>>() else {
            return;
        };
        for (idx, data) in updates {
            vec_model.set_row_data(idx, data);
        }
    }
}

fn main() {
    // 初始化日志输出
    let _ = SubscriberBuilder::default()
        .with_max_level(tracing::Level::INFO)
        .try_init();

    tracing::info!("👋 你好！正在启动博文阅读器");

    let app = AppWindow::new().expect("UI 初始化失败");

    let prefs = match PrefStore::default_path() {
        Some(path) => PrefStore::open(path),
        None => {
            tracing::warn!("未找到配置目录，偏好仅保存在内存中");
            PrefStore::in_memory()
        }
    };
    let prefs = Rc::new(RefCell::new(prefs));
    let state = Rc::new(RefCell::new(ReaderState::default()));

    // 创建VM桥接器并绑定UI回调
    let bridge = ViewModelBridge::new(&app, state.clone(), prefs.clone());
    bridge.initialize_ui(&app);

    tracing::info!("应用启动成功，UI已初始化");
    app.run().unwrap();
}
