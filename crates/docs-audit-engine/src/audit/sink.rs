/// Receives the human-readable audit trace, one line at a time.
pub trait AuditLog {
    fn append_line(&mut self, line: &str);
}

impl AuditLog for Vec<String> {
    fn append_line(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

/// Forwards audit lines to the `log` facade at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogForwarder;

impl AuditLog for LogForwarder {
    fn append_line(&mut self, line: &str) {
        log::info!("{line}");
    }
}
