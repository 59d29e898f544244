use anyhow::{anyhow, bail, Context};
use shared::TransactionKind;
use std::io::Write;
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error};

use crediwise::components::chat_transcript;
use crediwise::pages::auth::{LoginForm, SignupForm};
use crediwise::pages::credit_analysis::CreditAnalysisPage;
use crediwise::pages::credit_education::CreditEducationPage;
use crediwise::pages::dashboard::{DashboardPage, DeleteOutcome};
use crediwise::pages::profile::ProfilePage;
use crediwise::pages::transactions::TransactionsPage;
use crediwise::router::{self, Redirect};
use crediwise::services::logging::init_logging;
use crediwise::{ApiClient, ClientConfig, FileSessionStore};

const USAGE: &str = "\
Usage: crediwise <command>

  ping                                         check the server is up
  signup <name> <email> <password>             create an account
  login <email> <password>                     sign in
  logout                                       sign out
  dashboard                                    balance, recent activity, goals
  transactions                                 full transaction history
  add-transaction <income|expense> <amount> <description...>
  goal-add <amount> <title...>                 create a savings goal
  goal-progress <goal id> <amount>             add money to a goal
  goal-delete <goal id> [--yes]                delete a goal
  credit                                       credit score, tips and insights
  analysis                                     AI credit analysis report
  chat                                         talk to the credit assistant
  profile                                      show your profile
  profile-update <username> [password confirmation]";

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Ping,
    Signup { name: String, email: String, password: String },
    Login { email: String, password: String },
    Logout,
    Dashboard,
    Transactions,
    AddTransaction { kind: TransactionKind, amount: String, description: String },
    GoalAdd { amount: String, title: String },
    GoalProgress { goal_id: String, amount: String },
    GoalDelete { goal_id: String, confirmed: bool },
    Credit,
    Analysis,
    Chat,
    Profile,
    ProfileUpdate { username: String, password: Option<(String, String)> },
    Help,
}

impl Command {
    fn parse(args: &[String]) -> anyhow::Result<Self> {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let command = match args.as_slice() {
            [] | ["help"] | ["--help"] | ["-h"] => Command::Help,
            ["ping"] => Command::Ping,
            ["signup", name, email, password] => Command::Signup {
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            },
            ["login", email, password] => Command::Login {
                email: email.to_string(),
                password: password.to_string(),
            },
            ["logout"] => Command::Logout,
            ["dashboard"] => Command::Dashboard,
            ["transactions"] => Command::Transactions,
            ["add-transaction", kind, amount, description @ ..] if !description.is_empty() => {
                Command::AddTransaction {
                    kind: kind.parse()?,
                    amount: amount.to_string(),
                    description: description.join(" "),
                }
            }
            ["goal-add", amount, title @ ..] if !title.is_empty() => Command::GoalAdd {
                amount: amount.to_string(),
                title: title.join(" "),
            },
            ["goal-progress", goal_id, amount] => Command::GoalProgress {
                goal_id: goal_id.to_string(),
                amount: amount.to_string(),
            },
            ["goal-delete", goal_id] => Command::GoalDelete {
                goal_id: goal_id.to_string(),
                confirmed: false,
            },
            ["goal-delete", goal_id, "--yes"] => Command::GoalDelete {
                goal_id: goal_id.to_string(),
                confirmed: true,
            },
            ["credit"] => Command::Credit,
            ["analysis"] => Command::Analysis,
            ["chat"] => Command::Chat,
            ["profile"] => Command::Profile,
            ["profile-update", username] => Command::ProfileUpdate {
                username: username.to_string(),
                password: None,
            },
            ["profile-update", username, password, confirmation] => Command::ProfileUpdate {
                username: username.to_string(),
                password: Some((password.to_string(), confirmation.to_string())),
            },
            _ => bail!("Unrecognised command: {}\n\n{}", args.join(" "), USAGE),
        };
        Ok(command)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = match ClientConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config.log_level);
    debug!("Using API at {}", config.api_base_url);

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&config, &args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &ClientConfig, args: &[String]) -> anyhow::Result<()> {
    let command = Command::parse(args)?;
    let api = ApiClient::new(config)?;
    let store = FileSessionStore::new(config.session_file());

    match command {
        Command::Help => println!("{}", USAGE),
        Command::Ping => {
            let ack = api.ping().await?;
            println!(
                "✅ {} ({})",
                ack.message.unwrap_or_else(|| "Server is up".to_string()),
                api.base_url()
            );
        }
        Command::Signup { name, email, password } => {
            let mut form = SignupForm::new(name, email, password);
            if form.submit(&api).await.is_none() {
                bail!(form.error.unwrap_or_default());
            }
            println!("{}", form.notice.unwrap_or_default());
        }
        Command::Login { email, password } => {
            let mut form = LoginForm::new(email, password);
            match form.submit(&api, &store).await {
                Some(next) => {
                    println!("✅ Signed in as {}", form.email.trim());
                    let page = signed_in(DashboardPage::open(&api, &store).await)?;
                    debug!("Continuing to {}", next);
                    print_lines(page.render());
                }
                None => bail!(form.error.unwrap_or_default()),
            }
        }
        Command::Logout => {
            router::logout(&store)?;
            println!("👋 Signed out.");
        }
        Command::Dashboard => {
            let page = signed_in(DashboardPage::open(&api, &store).await)?;
            print_lines(page.render());
        }
        Command::Transactions => {
            let page = signed_in(TransactionsPage::open(&api, &store).await)?;
            print_lines(page.render());
        }
        Command::AddTransaction { kind, amount, description } => {
            let mut page = signed_in(TransactionsPage::open(&api, &store).await)?;
            let result = page.add_transaction(&description, &amount, kind).await;
            print_lines(page.render());
            result?;
        }
        Command::GoalAdd { amount, title } => {
            let mut page = signed_in(DashboardPage::open(&api, &store).await)?;
            let result = page.add_goal(&title, &amount).await;
            print_lines(page.render());
            result?;
        }
        Command::GoalProgress { goal_id, amount } => {
            let mut page = signed_in(DashboardPage::open(&api, &store).await)?;
            let result = page.update_goal_progress(&goal_id, &amount).await;
            print_lines(page.render());
            result?;
        }
        Command::GoalDelete { goal_id, confirmed } => {
            let mut page = signed_in(DashboardPage::open(&api, &store).await)?;
            let outcome = page
                .delete_goal(&goal_id, |goal| confirmed || confirm(&format!("Delete goal \"{}\"?", goal.title)))
                .await?;
            match outcome {
                DeleteOutcome::Deleted(_) => print_lines(page.render()),
                DeleteOutcome::Cancelled => println!("Nothing deleted."),
            }
        }
        Command::Credit => {
            let page = signed_in(CreditEducationPage::open(&api, &store).await)?;
            print_lines(page.render());
        }
        Command::Analysis => {
            let mut page = signed_in(CreditAnalysisPage::open(&api, &store))?;
            page.load_report().await;
            print_lines(page.render());
        }
        Command::Chat => chat(&api, &store).await?,
        Command::Profile => {
            let page = signed_in(ProfilePage::open(&api, &store).await)?;
            print_lines(page.render());
        }
        Command::ProfileUpdate { username, password } => {
            let mut page = signed_in(ProfilePage::open(&api, &store).await)?;
            page.state.username = username;
            if let Some((password, confirmation)) = password {
                page.state.password = password;
                page.state.confirm_password = confirmation;
            }
            let result = page.update(&store).await;
            print_lines(page.render());
            result?;
        }
    }
    Ok(())
}

/// Interactive assistant session; a blank line or end of input exits
async fn chat(api: &ApiClient, store: &FileSessionStore) -> anyhow::Result<()> {
    let mut page = signed_in(CreditAnalysisPage::open(api, store))?;
    print_lines(chat_transcript::render(&page.state.messages));

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("You: ");
        std::io::stdout().flush()?;

        let Some(line) = input.next_line().await.context("Failed to read from stdin")? else {
            break;
        };
        if line.trim().is_empty() {
            break;
        }
        if let Some(reply) = page.send(&line).await {
            println!("CrediWise AI: {}", reply.text);
        }
    }

    page.leave();
    Ok(())
}

fn signed_in<T>(page: Result<T, Redirect>) -> anyhow::Result<T> {
    page.map_err(|Redirect(route)| {
        anyhow!(
            "🔒 Please sign in first: crediwise login <email> <password> (redirected to {})",
            route
        )
    })
}

/// Ask a yes/no question on the terminal; anything but "y" or "yes" is a no
fn confirm(question: &str) -> bool {
    print!("{} [y/N] ", question);
    if std::io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    match std::io::stdin().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> anyhow::Result<Command> {
        let args: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        Command::parse(&args)
    }

    #[test]
    fn test_parse_add_transaction_joins_description() {
        assert_eq!(
            parse("add-transaction expense 12.50 Coffee with Sam").unwrap(),
            Command::AddTransaction {
                kind: TransactionKind::Expense,
                amount: "12.50".to_string(),
                description: "Coffee with Sam".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_rejects_unknown_kind() {
        let error = parse("add-transaction refund 5 Shoes").unwrap_err();

        assert!(error.to_string().contains("refund"));
    }

    #[test]
    fn test_parse_goal_delete_flags() {
        assert_eq!(
            parse("goal-delete 7 --yes").unwrap(),
            Command::GoalDelete {
                goal_id: "7".to_string(),
                confirmed: true,
            }
        );
        assert!(parse("goal-delete").is_err());
    }

    #[test]
    fn test_parse_profile_update_with_password() {
        assert_eq!(
            parse("profile-update alice_w s3cret s3cret").unwrap(),
            Command::ProfileUpdate {
                username: "alice_w".to_string(),
                password: Some(("s3cret".to_string(), "s3cret".to_string())),
            }
        );
        assert_eq!(parse("").unwrap(), Command::Help);
    }
}
