use std::fs::File;
use std::io;
use std::sync::Arc;

use chatui::client::HttpEndpoint;
use chatui::core::config::{self, CliOverrides};
use chatui::core::widget::ChatWidget;
use chatui::render::ViewBuffer;
use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "chatui", about = "Terminal chat client for a JSON chat endpoint")]
struct Args {
    /// Chat endpoint URL (overrides CHATUI_API_URL and the config file)
    #[arg(short, long)]
    url: Option<String>,

    /// Name shown on replies
    #[arg(long)]
    system_name: Option<String>,

    /// Name shown on your own messages
    #[arg(long)]
    user_name: Option<String>,

    /// Input prompt before the first message
    #[arg(long)]
    placeholder: Option<String>,

    /// Log level written to chatui.log
    #[arg(long, default_value_t = LevelFilter::Debug)]
    log_level: LevelFilter,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            url: self.url.clone(),
            placeholder: self.placeholder.clone(),
            system_name: self.system_name.clone(),
            user_name: self.user_name.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // File logger: the terminal belongs to the UI
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("chatui.log") {
        let _ = WriteLogger::init(args.log_level, log_config, log_file);
    }

    let file_config = config::load_config().map_err(io::Error::other)?;
    let resolved = config::resolve(&file_config, &args.overrides()).map_err(io::Error::other)?;

    log::info!("chatui starting up, endpoint: {}", resolved.widget.api_url);

    let endpoint = HttpEndpoint::new(
        resolved.widget.api_url.clone(),
        resolved.headers,
        resolved.timeout,
    )
    .map_err(io::Error::other)?;

    let widget = ChatWidget::new(resolved.widget, Arc::new(endpoint), ViewBuffer::new());
    chatui::tui::run(widget)
}
