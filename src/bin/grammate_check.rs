use clap::Parser;
use grammate::client::render::{render_state, RenderOptions};
use grammate::client::{Form, FormState, HttpCheckClient, Submission};
use grammate::utils::logger;
use std::io::{IsTerminal, Read};

#[derive(Parser)]
#[command(name = "grammate-check")]
#[command(about = "Check the grammar of a text against a running grammate server")]
struct Args {
    /// Text to check; read from stdin when omitted
    text: Option<String>,

    /// Base URL of the grammate server
    #[arg(long, env = "GRAMMATE_SERVER_URL", default_value = "http://localhost:5000")]
    server_url: String,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let text = match args.text {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let options = RenderOptions {
        color: !args.no_color && std::io::stdout().is_terminal(),
    };
    let api = HttpCheckClient::new(&args.server_url);
    let mut form = Form::with_input(text);

    match form.submit(&api).await {
        Submission::Blank => {
            eprintln!("Nothing to check: the text is empty.");
            std::process::exit(2);
        }
        Submission::Busy | Submission::Completed => {}
    }

    print!("{}", render_state(form.state(), options));
    if matches!(form.state(), FormState::Error(_)) {
        std::process::exit(1);
    }
    Ok(())
}
