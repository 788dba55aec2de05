//! convoprint CLI
//!
//! Usage: convoprint <URL|FILE> [options]
//!
//! Captures the rendered conversation (or reads a saved snapshot) and
//! writes a print-ready PDF.

use convoprint::{BidiPolicy, ExportConfig, ExportError};

const USAGE: &str = "\
Usage: convoprint <URL|FILE> [options]

Options:
  -o, --output <NAME>        Output filename (default: chatgpt_conversation.pdf)
      --output-dir <DIR>     Directory to write the PDF into (default: .)
      --font-size <SIZE>     Uniform font size, any CSS length (default: 12px)
      --bidi <POLICY>        'runs' (default) or 'block'
      --theme <NAME>         Syntax highlighting theme (default: InspiredGitHub)
      --math-bundle <URL>    MathJax bundle URL override
      --untrusted-math       Load the typesetter's safe extension
      --question-selector <SEL>  Selector for question nodes
      --answer-selector <SEL>    Selector for answer nodes
      --no-headless          Show the browser window
  -h, --help                 Show this help
";

fn parse_args() -> Result<Option<ExportConfig>, String> {
    let mut source: Option<String> = None;
    let mut builder_opts: Vec<(String, String)> = Vec::new();
    let mut headless = true;
    let mut math_trusted = true;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        let mut take_value = |name: &str| {
            args.next()
                .ok_or_else(|| format!("missing value for {name}"))
        };
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "-o" | "--output" => builder_opts.push(("output".into(), take_value("--output")?)),
            "--output-dir" => builder_opts.push(("output-dir".into(), take_value("--output-dir")?)),
            "--font-size" => builder_opts.push(("font-size".into(), take_value("--font-size")?)),
            "--bidi" => builder_opts.push(("bidi".into(), take_value("--bidi")?)),
            "--theme" => builder_opts.push(("theme".into(), take_value("--theme")?)),
            "--math-bundle" => {
                builder_opts.push(("math-bundle".into(), take_value("--math-bundle")?))
            }
            "--question-selector" => {
                builder_opts.push(("question-selector".into(), take_value("--question-selector")?))
            }
            "--answer-selector" => {
                builder_opts.push(("answer-selector".into(), take_value("--answer-selector")?))
            }
            "--untrusted-math" => math_trusted = false,
            "--no-headless" => headless = false,
            other if other.starts_with('-') => return Err(format!("unknown option: {other}")),
            other => {
                if source.is_some() {
                    return Err(format!("unexpected argument: {other}"));
                }
                source = Some(other.to_string());
            }
        }
    }

    let source = source.ok_or_else(|| "missing <URL|FILE> argument".to_string())?;

    let mut builder = ExportConfig::builder()
        .headless(headless)
        .math_trusted(math_trusted)
        .source(source);
    for (key, value) in builder_opts {
        builder = match key.as_str() {
            "output" => builder.filename(value),
            "output-dir" => builder.output_dir(value),
            "font-size" => builder.font_size(value),
            "bidi" => match value.as_str() {
                "runs" => builder.bidi_policy(BidiPolicy::Runs),
                "block" => builder.bidi_policy(BidiPolicy::Block),
                other => return Err(format!("invalid --bidi policy: {other}")),
            },
            "theme" => builder.highlight_theme(value),
            "math-bundle" => builder.math_bundle_url(value),
            "question-selector" => builder.question_selector(value),
            "answer-selector" => builder.answer_selector(value),
            _ => builder,
        };
    }

    builder.build().map(Some).map_err(|e| format!("{e:#}"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter_module("chromiumoxide::handler", log::LevelFilter::Off)
        .filter_module("chromiumoxide::conn", log::LevelFilter::Off)
        .init();

    let config = match parse_args() {
        Ok(Some(config)) => config,
        Ok(None) => {
            print!("{USAGE}");
            return Ok(());
        }
        Err(message) => {
            eprintln!("error: {message}\n\n{USAGE}");
            std::process::exit(2);
        }
    };

    match convoprint::export(config).await {
        Ok(summary) => {
            log::info!(
                "PDF download complete: {} ({} bytes, {} pair(s))",
                summary.pdf_path.display(),
                summary.bytes_written,
                summary.pair_count
            );
            Ok(())
        }
        Err(ExportError::ExtractionEmpty) => {
            log::warn!("No conversation found; nothing exported.");
            Ok(())
        }
        Err(ExportError::Cancelled) => {
            log::info!("PDF generation cancelled.");
            Ok(())
        }
        Err(e) => {
            log::error!("PDF generation failed: {e}");
            Err(e.into())
        }
    }
}
