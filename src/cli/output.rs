use console::{style, Color};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub struct OutputFormatter {
    use_colors: bool,
}

impl OutputFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    pub fn format_success(&self, message: &str) -> String {
        self.style_text(message, Color::Green)
    }

    pub fn format_info(&self, message: &str) -> String {
        self.style_text(message, Color::Cyan)
    }

    pub fn format_warning(&self, message: &str) -> String {
        self.style_text(&format!("Warning: {message}"), Color::Yellow)
    }

    pub fn format_error(&self, message: &str) -> String {
        self.style_text(&format!("Error: {message}"), Color::Red)
    }

    fn style_text(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            style(text).fg(color).to_string()
        } else {
            text.to_string()
        }
    }
}

/// Terminal spinner shown while a backend call is in flight. Renders to
/// stderr so piped stdout stays clean.
pub struct Spinner {
    running: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl Spinner {
    pub fn new(message: &str) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();
        let message = message.to_string();

        let handle = thread::spawn(move || {
            let frames = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
            let mut frame_index = 0;

            while running_clone.load(Ordering::Relaxed) {
                eprint!("\r{} {}", frames[frame_index], message);
                let _ = io::stderr().flush();
                frame_index = (frame_index + 1) % frames.len();
                thread::sleep(Duration::from_millis(100));
            }

            // Clear the spinner line
            eprint!("\r{}\r", " ".repeat(message.len() + 3));
            let _ = io::stderr().flush();
        });

        Self {
            running,
            handle: Some(handle),
        }
    }

    pub fn stop(mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
