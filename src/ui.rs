use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

#[derive(Clone, Copy, Debug)]
pub enum UiMode {
    Auto,
    Plain,
    Pretty,
}

/// Stderr progress reporting for the binaries. Pretty mode draws an
/// indicatif bar; plain mode prints one line per subject so logs stay
/// readable when piped.
#[derive(Clone, Debug)]
pub struct Ui {
    mode: UiMode,
    is_tty: bool,
}

impl Ui {
    pub fn from_args(ui_flag: Option<&str>, is_tty: bool) -> Self {
        let mode = match ui_flag {
            Some("plain") => UiMode::Plain,
            Some("pretty") => UiMode::Pretty,
            _ => UiMode::Auto,
        };
        Self { mode, is_tty }
    }

    fn use_pretty(&self) -> bool {
        match self.mode {
            UiMode::Pretty => true,
            UiMode::Plain => false,
            UiMode::Auto => self.is_tty,
        }
    }

    /// Progress across the catalog's subjects.
    pub fn subject_bar(&self, total: u64) -> SubjectProgress {
        if self.use_pretty() {
            let bar = ProgressBar::new(total);
            bar.set_draw_target(ProgressDrawTarget::stderr());
            let style = ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            bar.set_style(style);
            SubjectProgress {
                bar: Some(bar),
                done: 0,
                total,
            }
        } else {
            SubjectProgress {
                bar: None,
                done: 0,
                total,
            }
        }
    }
}

pub struct SubjectProgress {
    bar: Option<ProgressBar>,
    done: u64,
    total: u64,
}

impl SubjectProgress {
    pub fn advance(&mut self, label: &str) {
        self.done += 1;
        if let Some(bar) = &self.bar {
            bar.set_message(label.to_string());
            bar.inc(1);
        } else {
            eprintln!("==> subject {}/{}: {}", self.done, self.total, label);
        }
    }

    pub fn finish(self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}
