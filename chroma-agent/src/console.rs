//! Interactive console adapter.
//!
//! A thin line-oriented boundary that maps user input onto
//! [`ChromaApp`] operations. No capture, transmission, or state logic
//! lives here.

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::app::ChromaApp;

const HELP: &str = "\
commands:
  sources        list available frame sources
  use <id>       select a frame source
  send           transmit the current color once
  auto on|off    toggle periodic retransmission
  color          show the current estimate
  status         show source, auto mode, and any active error
  help           this text
  quit           exit";

/// Run the console until `quit` or end of input.
pub async fn run(app: &mut ChromaApp) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("chroma-agent ready — type `help` for commands");
    while let Some(line) = lines.next_line().await? {
        let mut words = line.split_whitespace();
        match (words.next(), words.next()) {
            (Some("sources"), _) => {
                for descriptor in app.sources() {
                    let marker = match app.active_source() {
                        Some(active) if active.id == descriptor.id => "*",
                        _ => " ",
                    };
                    println!("{marker} {descriptor}");
                }
            }
            (Some("use"), Some(id)) => match app.select_source(id) {
                Ok(()) => println!("capturing from {id}"),
                Err(e) => println!("error: {e}"),
            },
            (Some("use"), None) => println!("usage: use <id>"),
            (Some("send"), _) => {
                let result = app.send_now().await;
                if result.success {
                    println!("sent {} in {}ms", app.current_color(), result.elapsed_ms());
                } else {
                    println!(
                        "error: {}",
                        result.message.as_deref().unwrap_or("transmission failed")
                    );
                }
            }
            (Some("auto"), Some("on")) => {
                if app.set_auto(true) {
                    println!("auto mode on");
                } else {
                    println!("auto mode already on");
                }
            }
            (Some("auto"), Some("off")) => {
                if app.set_auto(false) {
                    println!("auto mode off");
                } else {
                    println!("auto mode already off");
                }
            }
            (Some("auto"), _) => println!("usage: auto on|off"),
            (Some("color"), _) => println!("{}", app.current_color()),
            (Some("status"), _) => {
                match app.active_source() {
                    Some(descriptor) => println!("source: {descriptor}"),
                    None => println!("source: none"),
                }
                println!("auto:   {}", app.auto_phase());
                println!("color:  {}", app.current_color());
                match app.active_error() {
                    Some(message) => println!("error:  {message}"),
                    None => println!("error:  none"),
                }
            }
            (Some("help"), _) => println!("{HELP}"),
            (Some("quit") | Some("exit"), _) => break,
            (None, _) => {}
            (Some(other), _) => println!("unknown command: {other} (try `help`)"),
        }
    }

    Ok(())
}
