use gitpilot::config::{ConfigProvider, FileConfigProvider};
use gitpilot::outputs::{ChatMessage, MessageSink, Role};
use gitpilot::services::{AiCodeModifier, DeepSeekClient, GitCloner, GitHubClient, JsonProjectStore, TerminalEditor};
use gitpilot::{Collaborators, Conversation, Dispatcher, IntentService};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Prints conversation messages to stdout.
struct ConsoleSink;

impl MessageSink for ConsoleSink {
    fn emit(&self, message: ChatMessage) {
        print_message(&message);
    }
}

fn print_message(message: &ChatMessage) {
    match (message.role, message.is_loading) {
        (Role::User, _) => println!("[you] {}", message.content),
        (Role::Assistant, true) => println!("[assistant…] {}", message.content),
        (Role::Assistant, false) => println!("[assistant] {}\n", message.content),
    }
}

/// One line of terminal input.
#[derive(Debug, PartialEq)]
enum Command<'a> {
    Quit,
    File(Option<&'a str>),
    Readme(&'a str),
    Repo(&'a str),
    Projects,
    Delete(Option<&'a str>),
    /// Anything else goes to the conversation.
    Turn(&'a str),
}

fn parse_command(line: &str) -> Command<'_> {
    let (cmd, rest) = line.split_once(' ').map_or((line, ""), |(cmd, rest)| (cmd, rest.trim()));
    let arg = (!rest.is_empty()).then_some(rest);
    match cmd {
        ":quit" | ":q" => Command::Quit,
        ":file" => Command::File(arg),
        ":readme" => Command::Readme(rest),
        ":repo" => Command::Repo(rest),
        ":projects" => Command::Projects,
        ":delete" => Command::Delete(arg),
        _ => Command::Turn(line),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout carries only the conversation.
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config_provider = match std::env::args().nth(1) {
        Some(path) => FileConfigProvider::new(Some(PathBuf::from(path))),
        None => FileConfigProvider::default_location(),
    };
    if let Some(path) = config_provider.path() {
        tracing::info!("Config file: {}", path.display());
    }
    let config: Arc<dyn ConfigProvider> = Arc::new(config_provider);

    let completion = Arc::new(DeepSeekClient::new(config.clone()));
    let github = Arc::new(GitHubClient::new(config.clone()));
    let editor = Arc::new(TerminalEditor::new(config.clone()));
    let store = Arc::new(JsonProjectStore::from_config(config.clone()));
    tracing::info!("Project list: {}", store.path().display());

    let intents = IntentService::new(completion.clone());
    let collaborators = Collaborators {
        search: github.clone(),
        download: Arc::new(GitCloner::default()),
        projects: store.clone(),
        code: Arc::new(AiCodeModifier::new(completion)),
        editor: editor.clone(),
    };
    let dispatcher = Dispatcher::new(collaborators, intents.clone(), config);
    let mut conversation = Conversation::new(intents, dispatcher);

    println!("gitpilot ready. Try \"find a rust cli project\", \":file <path>\", \":readme owner/repo\", \":repo owner/repo\", \":projects\", \":delete <id>\" or \":quit\".");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_command(line) {
            Command::Quit => break,
            Command::File(None) => {
                editor.set_active_file(None);
                println!("Active file cleared.\n");
            }
            Command::File(Some(path)) => {
                editor.set_active_file(Some(PathBuf::from(path)));
                println!("Active file: {}\n", path);
            }
            Command::Readme(repo) => match repo.split_once('/') {
                Some((owner, name)) => match github.repository_readme(owner, name).await {
                    Ok(Some(text)) => println!("{}\n", text),
                    Ok(None) => println!("{} has no README.\n", repo),
                    Err(e) => println!("README lookup failed: {}\n", e),
                },
                None => println!("Usage: :readme owner/repo\n"),
            },
            Command::Repo(repo) => match repo.split_once('/') {
                Some((owner, name)) => match github.repository_details(owner, name).await {
                    Ok(details) => println!(
                        "{} · {} stars · {} forks · {}\n{}\n{}\n",
                        details.full_name,
                        details.stars,
                        details.forks,
                        details.language.as_deref().unwrap_or("N/A"),
                        details.description.as_deref().unwrap_or("No description"),
                        details.html_url
                    ),
                    Err(e) => println!("Repository lookup failed: {}\n", e),
                },
                None => println!("Usage: :repo owner/repo\n"),
            },
            Command::Projects => {
                // Only checkouts that still exist on disk.
                for project in store.valid_projects().await {
                    println!("• [{}] {} -> {}", project.id, project.full_name, project.local_path.display());
                }
                println!();
            }
            Command::Delete(Some(id)) => match store.delete(id).await {
                Ok(()) => println!("Deleted project {}.\n", id),
                Err(e) => println!("Delete failed: {}\n", e),
            },
            Command::Delete(None) => println!("Usage: :delete <id>\n"),
            Command::Turn(text) => {
                if let Some(reply) = conversation.handle_user_message(text, &ConsoleSink).await {
                    print_message(&reply);
                }
            }
        }
    }

    tracing::info!("gitpilot stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_with_arguments() {
        assert_eq!(parse_command(":file src/lib.rs"), Command::File(Some("src/lib.rs")));
        assert_eq!(parse_command(":delete  42 "), Command::Delete(Some("42")));
        assert_eq!(parse_command(":readme a/one"), Command::Readme("a/one"));
    }

    #[test]
    fn test_missing_arguments_stay_commands() {
        assert_eq!(parse_command(":delete"), Command::Delete(None));
        assert_eq!(parse_command(":file"), Command::File(None));
        assert_eq!(parse_command(":repo"), Command::Repo(""));
    }

    #[test]
    fn test_other_input_is_a_turn() {
        assert_eq!(parse_command("download the second one"), Command::Turn("download the second one"));
        assert_eq!(parse_command(":q"), Command::Quit);
    }
}
