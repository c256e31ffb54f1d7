mod files;
mod report;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use futures::executor::block_on;
use timeline_core::{Control, Key, Rect, Scene, TimelineApp, TimelineConfig, UiEvent};
use tracing_subscriber::EnvFilter;

use crate::files::{FileSource, FileThemeStore};
use crate::report::{column_layout, write_detail, write_scene, CARD_WIDTH};

#[derive(Parser, Debug)]
#[command(
    name = "timeline-cli",
    about = "Hiển thị timeline sự kiện từ file JSON ngay trên terminal."
)]
struct Args {
    /// Đường dẫn tới file JSON `{ "events": [...] }`.
    #[arg(short, long, default_value = "data/events.json")]
    input: String,

    /// File lưu lựa chọn theme giữa các lần chạy.
    #[arg(long, default_value = ".timeline-state.json")]
    state: PathBuf,

    /// Chuyển theme sáng/tối trước khi hiển thị.
    #[arg(long)]
    toggle_theme: bool,

    /// Mở overlay chi tiết cho sự kiện có id này (có thể lặp lại).
    #[arg(long = "open", value_name = "ID")]
    open: Vec<i64>,

    /// Chiều cao khung nhìn (px) dùng để quyết định thẻ nào được hiệu ứng.
    #[arg(long, default_value_t = 900.0)]
    viewport_height: f64,

    /// Số ký tự mô tả trên mỗi thẻ.
    #[arg(long)]
    limit: Option<usize>,

    /// Ảnh thay thế khi ảnh sự kiện lỗi.
    #[arg(long)]
    placeholder: Option<String>,
}

impl Args {
    fn config(&self) -> TimelineConfig {
        let mut config = TimelineConfig {
            data_url: self.input.clone(),
            ..TimelineConfig::default()
        };
        if let Some(limit) = self.limit {
            config.description_limit = limit;
        }
        if let Some(placeholder) = &self.placeholder {
            config.placeholder_image = placeholder.clone();
        }
        config
    }
}

fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
        .context("Không khởi tạo được logging")
}

fn main() -> anyhow::Result<()> {
    init_tracing()?;
    let args = Args::parse();

    let source = FileSource::new(".");
    let mut store = FileThemeStore::new(&args.state);
    let mut scene = Scene::default();
    let mut app = TimelineApp::new(args.config());

    block_on(app.start(&source, &store, &mut scene));

    if args.toggle_theme {
        app.dispatch(UiEvent::Activate(Control::ThemeToggle), &mut scene, &mut store);
    }

    let viewport = Rect::new(0.0, 0.0, CARD_WIDTH, args.viewport_height);
    app.begin_observing();
    let animated = app.scan_viewport(&column_layout(&scene), viewport, &mut scene);
    tracing::debug!(animated, "scroll pass finished");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_scene(&scene, &mut out).context("Không ghi được kết quả")?;

    for id in &args.open {
        if !app.dispatch(UiEvent::Activate(Control::LearnMore(*id)), &mut scene, &mut store) {
            writeln!(out, "\nKhông có sự kiện #{id}")?;
            continue;
        }
        if let Some(detail) = &scene.overlay {
            write_detail(detail, &mut out).context("Không ghi được chi tiết")?;
        }
        app.dispatch(UiEvent::KeyDown(Key::Escape), &mut scene, &mut store);
    }

    Ok(())
}
