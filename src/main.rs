//! Memorize - terminal front end
//!
//! Reads commands and search queries from stdin, one per line, and prints
//! whatever the presenter publishes.

use anyhow::{Context, Result};
use std::time::Duration;
use memorize_lib::{get_data_dir, AppState, MemorizeConfig, WordFilterType, WordRecord, WordsPresenter, WordsView};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// How long `:quit` waits for in-flight lookups and loads
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

const HELP: &str = "\
commands:
  <text>        search saved words, then the dictionary
  :remote <q>   search the dictionary only
  :all | :active | :recent
                change the list filter and reload
  :reload       reload words from the database
  :open <n>     open (and save) word n of the last list
  :fav <n>      toggle favorite on word n
  :done <n>     toggle memorized on word n
  :help         show this help
  :quit         exit";

/// Prints published state and remembers the last list for `:open`
#[derive(Default)]
struct ConsoleView {
    shown: Vec<WordRecord>,
    loading: bool,
}

impl ConsoleView {
    fn word_at(&self, arg: &str) -> Option<WordRecord> {
        let index: usize = arg.trim().parse().ok()?;
        self.shown.get(index).cloned()
    }
}

impl WordsView for ConsoleView {
    fn set_loading_indicator(&mut self, active: bool) {
        if active && !self.loading {
            println!("…");
        }
        self.loading = active;
    }

    fn show_words(&mut self, words: &[WordRecord]) {
        if words.is_empty() {
            println!("(no words)");
        }
        for (i, word) in words.iter().enumerate() {
            let mut marks = String::new();
            if word.favorite {
                marks.push('★');
            }
            if word.memorized {
                marks.push('✓');
            }
            println!(
                "{:>3}  {} 【{}】 {} {}",
                i,
                word.primary_form,
                word.character,
                word.meanings.join("; "),
                marks
            );
        }
        self.shown = words.to_vec();
    }

    fn show_word_detail(&mut self, word: &WordRecord) {
        println!("{} 【{}】", word.primary_form, word.character);
        for (i, meaning) in word.meanings.iter().enumerate() {
            println!("  {}. {}", i + 1, meaning);
        }
        if !word.parts_of_speech.is_empty() {
            println!("  pos:   {}", word.parts_of_speech.join(", "));
        }
        if !word.tags.is_empty() {
            println!("  tags:  {}", word.tags.join(", "));
        }
        if let Some(notes) = &word.notes {
            println!("  notes: {}", notes);
        }
        println!("  added: {}", word.created_at.format("%Y-%m-%d %H:%M"));
    }

    fn show_loading_words_error(&mut self) {
        eprintln!("Could not load saved words.");
    }
}

/// Handle one input line. Returns false when the user asked to quit.
fn handle_line(presenter: &mut WordsPresenter<ConsoleView>, line: &str) -> bool {
    let (command, arg) = match line.split_once(' ') {
        Some((command, arg)) => (command, arg.trim()),
        None => (line, ""),
    };

    match command {
        "" => {}
        ":quit" | ":q" => return false,
        ":help" => println!("{}", HELP),
        ":all" | ":active" | ":recent" => {
            presenter.set_filter_type(WordFilterType::from(&command[1..]));
            presenter.load_words(false);
        }
        ":reload" => presenter.load_words(true),
        ":remote" if arg.is_empty() => eprintln!("Usage: :remote <query>"),
        ":remote" => presenter.search_remote(arg),
        ":open" => match presenter.view().word_at(arg) {
            Some(word) => presenter.open_word_details(&word),
            None => eprintln!("No word {:?} in the last list", arg),
        },
        ":fav" | ":done" => match presenter.view().word_at(arg) {
            Some(mut word) => {
                if command == ":fav" {
                    word.favorite = !word.favorite;
                } else {
                    word.memorized = !word.memorized;
                }
                presenter.save_word(&word);
                presenter.load_words_with(false, false);
            }
            None => eprintln!("No word {:?} in the last list", arg),
        },
        _ if command.starts_with(':') => eprintln!("Unknown command {}. Try :help", command),
        _ => presenter.search(line),
    }
    true
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let data_dir = get_data_dir();
    info!("Using data directory: {:?}", data_dir);

    let config = MemorizeConfig::load(&data_dir).context("Failed to load configuration")?;
    let state = AppState::new(config)?;
    let mut presenter = state.presenter(ConsoleView::default());
    presenter.init();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line.context("Failed to read stdin")? {
                    Some(line) => {
                        if !handle_line(&mut presenter, line.trim()) {
                            break;
                        }
                    }
                    None => break,
                }
            }
            Some(task) = presenter.next_task() => presenter.dispatch(task),
        }
    }

    // Let in-flight loads and lookups finish printing
    if tokio::time::timeout(SHUTDOWN_GRACE, presenter.run_until_idle())
        .await
        .is_err()
    {
        warn!(pending = presenter.pending(), "exiting with background work unfinished");
    }
    Ok(())
}
