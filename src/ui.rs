use colored::*;
use terminal_size::{terminal_size, Height, Width};

use crate::agent::Reply;

pub fn print_header(name: &str, model: &str) {
    let (width, _) = terminal_size().unwrap_or((Width(80), Height(24)));
    let width = width.0 as usize;

    let line = "─".repeat(width);
    println!("{}", line.black().bold());

    let title = name.cyan().bold();
    let version = format!("v{}", env!("CARGO_PKG_VERSION")).black().bold();
    println!("  ❀ {} {}", title, version);

    let info = format!("  {}  •  {}", model, chrono::Local::now().format("%Y-%m-%d %H:%M")).black().bold();
    println!("{}", info);

    println!("{}", line.black().bold());
}

pub fn print_step(msg: &str) {
    println!("  {} {}", "•".green(), msg);
}

pub fn print_success(msg: &str) {
    println!("  {} {}", "✓".green().bold(), msg.green());
}

pub fn print_error(msg: &str) {
    println!("  {} {}", "✗".red().bold(), msg.red());
}

pub fn print_thinking(msg: &str) {
    println!("  {} {}...", "∴".magenta(), msg);
}

/// Print a companion reply with its emotion and expression annotations.
pub fn print_reply(name: &str, reply: &Reply) {
    println!("\n{}: {}", name.cyan().bold(), reply.text);
    println!("{}", format!("[Emotion detected: {}]", reply.emotion).black().bold());
    println!("{}", format!("[{}'s expression: {}]", name, reply.expression).black().bold());
}
