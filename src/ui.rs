use console::style;

pub fn status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

pub fn success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

pub fn warn(message: &str) {
    println!("{} {}", style("WARNING:").yellow().bold(), message);
}

pub fn error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}
