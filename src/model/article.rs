//! 文章数据核心：加载博文JSON并展开为可渲染的内容块列表

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::model::nav::NavState;
use crate::model::visibility::EntranceWatcher;
use crate::utils::fs::read_json_file;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON解析失败: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("状态错误: {0}")]
    State(String),
}

/// 博文文档：标题加若干可锚点导航的小节
#[derive(Debug, Clone, Deserialize)]
pub struct ArticleDoc {
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Section {
    /// 锚点id，导航链接以 "#id" 形式引用
    pub id: String,
    pub heading: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

/// 小节内容块：普通段落或带语言标注的代码块
#[derive(Debug, Clone, Deserialize)]
pub enum Block {
    #[serde(rename = "para")]
    Para(String),
    #[serde(rename = "code")]
    Code {
        #[serde(default)]
        lang: String,
        text: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Heading,
    Para,
    Code,
}

/// 展平后的渲染单元，与UI列表模型一一对应
#[derive(Debug, Clone)]
pub struct ContentBlock {
    pub kind: BlockKind,
    /// 所属小节的锚点id
    pub section: String,
    pub text: String,
    pub lang: String,
    /// 入场动画标记，置位一次后不再回退
    pub entered: bool,
    /// 复制按钮的临时确认态
    pub confirmed: bool,
}

/// 块在文章流中的几何信息，由UI布局后回报（内容坐标系）
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockGeometry {
    pub top: f32,
    pub height: f32,
}

/// 阅读器核心状态：文章内容、布局几何与各控制器状态
#[derive(Debug, Default)]
pub struct ReaderState {
    pub source_path: Option<PathBuf>,
    pub doc: Option<ArticleDoc>,
    pub blocks: Vec<ContentBlock>,
    pub geometry: Vec<Option<BlockGeometry>>,
    pub nav: NavState,
    pub watcher: EntranceWatcher,
    /// 最近一次滚动偏移（内容坐标，向下为正）
    pub last_scroll: f32,
    pub viewport_height: f32,
}

impl ReaderState {
    /// 从文件加载文章并重建内容块列表
    pub fn load_file(&mut self, p: &Path) -> Result<(), AppError> {
        let doc: ArticleDoc = read_json_file(p)?;
        self.source_path = Some(p.to_path_buf());
        self.install(doc);
        Ok(())
    }

    /// 装入内置示例文章（启动时与未打开文件前使用）
    pub fn load_sample(&mut self) {
        self.source_path = None;
        self.install(sample_article());
    }

    fn install(&mut self, doc: ArticleDoc) {
        self.blocks = flatten_blocks(&doc);
        self.geometry = vec![None; self.blocks.len()];
        // 所有内容块在装载时注册入场观察，之后不再补扫
        self.watcher = EntranceWatcher::new();
        for idx in 0..self.blocks.len() {
            self.watcher.observe(idx);
        }
        self.last_scroll = 0.0;
        self.doc = Some(doc);
    }

    /// 导航链接列表：(小节标题, "#锚点")
    pub fn nav_links(&self) -> Vec<(String, String)> {
        self.doc
            .as_ref()
            .map(|doc| {
                doc.sections
                    .iter()
                    .map(|s| (s.heading.clone(), format!("#{}", s.id)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// 锚点对应的标题块下标；锚点不存在时返回None
    pub fn anchor_block_index(&self, anchor: &str) -> Option<usize> {
        self.blocks
            .iter()
            .position(|b| b.kind == BlockKind::Heading && b.section == anchor)
    }

    /// 锚点目标块的顶边位置；块尚未完成布局时同样返回None
    pub fn anchor_top(&self, anchor: &str) -> Option<f32> {
        let idx = self.anchor_block_index(anchor)?;
        self.geometry.get(idx).copied().flatten().map(|g| g.top)
    }

    /// 记录块的布局几何；下标越界时返回false
    pub fn set_block_geometry(&mut self, idx: usize, top: f32, height: f32) -> bool {
        match self.geometry.get_mut(idx) {
            Some(slot) => {
                *slot = Some(BlockGeometry { top, height });
                true
            }
            None => false,
        }
    }

    pub fn block_text(&self, idx: usize) -> Option<&str> {
        self.blocks.get(idx).map(|b| b.text.as_str())
    }

    /// 设置复制确认态；下标越界或状态未变化时返回false
    pub fn set_confirmed(&mut self, idx: usize, confirmed: bool) -> bool {
        match self.blocks.get_mut(idx) {
            Some(block) if block.confirmed != confirmed => {
                block.confirmed = confirmed;
                true
            }
            _ => false,
        }
    }

    /// 以当前滚动位置评估入场观察，返回本次新标记的块下标
    pub fn evaluate_entrances(&mut self) -> Vec<usize> {
        let entered =
            self.watcher
                .evaluate(&self.geometry, self.last_scroll, self.viewport_height);
        for &idx in &entered {
            if let Some(block) = self.blocks.get_mut(idx) {
                block.entered = true;
            }
        }
        entered
    }
}

/// 将文档展平为块列表：每个小节先是标题块，随后是其内容块
pub fn flatten_blocks(doc: &ArticleDoc) -> Vec<ContentBlock> {
    let mut out = Vec::with_capacity(doc.sections.len() * 4);
    for section in &doc.sections {
        out.push(ContentBlock {
            kind: BlockKind::Heading,
            section: section.id.clone(),
            text: section.heading.clone(),
            lang: String::new(),
            entered: false,
            confirmed: false,
        });
        for block in &section.blocks {
            match block {
                Block::Para(text) => out.push(ContentBlock {
                    kind: BlockKind::Para,
                    section: section.id.clone(),
                    text: text.clone(),
                    lang: String::new(),
                    entered: false,
                    confirmed: false,
                }),
                Block::Code { lang, text } => out.push(ContentBlock {
                    kind: BlockKind::Code,
                    section: section.id.clone(),
                    text: text.clone(),
                    lang: lang.clone(),
                    entered: false,
                    confirmed: false,
                }),
            }
        }
    }
    out
}

/// 内置示例文章，同时充当文章格式的说明
pub fn sample_article() -> ArticleDoc {
    ArticleDoc {
        title: "欢迎使用博文阅读".to_string(),
        author: Some("bowen_yuedu".to_string()),
        date: Some("2025-08-06".to_string()),
        sections: vec![
            Section {
                id: "intro".to_string(),
                heading: "简介".to_string(),
                blocks: vec![
                    Block::Para(
                        "这是一个本地博文阅读器：从磁盘打开一篇JSON格式的文章，\
                         即可获得主题切换、小节导航、平滑滚动与代码一键复制等阅读体验。"
                            .to_string(),
                    ),
                    Block::Para(
                        "点击右上角的月亮/太阳图标切换深浅主题，选择会被记住；\
                         窄窗口下可用汉堡按钮呼出小节导航。"
                            .to_string(),
                    ),
                ],
            },
            Section {
                id: "format".to_string(),
                heading: "文章格式".to_string(),
                blocks: vec![
                    Block::Para(
                        "文章是一个JSON文档：标题加若干小节，每个小节由锚点id、\
                         小节标题和内容块组成，内容块是段落或代码。"
                            .to_string(),
                    ),
                    Block::Code {
                        lang: "json".to_string(),
                        text: "{\n  \"title\": \"我的文章\",\n  \"sections\": [\n    {\n      \"id\": \"intro\",\n      \"heading\": \"开头\",\n      \"blocks\": [\n        { \"para\": \"正文段落\" },\n        { \"code\": { \"lang\": \"python\", \"text\": \"print(1)\" } }\n      ]\n    }\n  ]\n}".to_string(),
                    },
                ],
            },
            Section {
                id: "code".to_string(),
                heading: "代码复制".to_string(),
                blocks: vec![
                    Block::Para(
                        "把鼠标移到代码块上会出现复制按钮，点击即可把代码原文\
                         放入系统剪贴板，按钮会短暂变成对勾作为确认。"
                            .to_string(),
                    ),
                    Block::Code {
                        lang: "python".to_string(),
                        text: "print(1)".to_string(),
                    },
                ],
            },
            Section {
                id: "about".to_string(),
                heading: "关于".to_string(),
                blocks: vec![Block::Para(
                    "内容块在首次滚入视野时会有一次入场过渡，之后保持可见。\
                     打开自己的文章开始阅读吧。"
                        .to_string(),
                )],
            },
        ],
    }
}
