//! Terminal front end for the debate client
//!
//! Signs in (or continues as a guest), walks through debate setup, then runs
//! the debate room against stdin/stdout.
//!
//! Usage: cargo run --bin debato [debate_id]

use anyhow::{anyhow, Result};
use dialoguer::{Confirm, Input, Password, Select};
use dotenvy::dotenv;
use log::{debug, info, warn};
use std::io::BufRead;
use std::sync::Arc;
use std::thread;
use tokio::sync::mpsc;

use debato::api::{
    AuthUser, Debate, DebateStatus, Difficulty, HttpDebateApi, Message, RegisterRequest, Sender, Winner,
};
use debato::core::{format_clock, truncate, wrap_text, Config, TERMINAL_WIDTH};
use debato::features::auth::{submit_login, submit_logout, submit_register, LoginForm};
use debato::features::session::{
    ClockSnapshot, DebateSession, Destination, SessionConfig, SessionDriver, SessionView,
    UserAction, FORFEIT_PROMPT,
};
use debato::features::setup::{SetupStep, SetupWizard, TIME_CHOICES};

/// Renders the debate room to stdout
struct TerminalView {
    input_enabled: bool,
    last_reply_shown: Option<u32>,
    last_total_shown: Option<u32>,
}

impl TerminalView {
    fn new() -> Self {
        TerminalView {
            input_enabled: false,
            last_reply_shown: None,
            last_total_shown: None,
        }
    }
}

impl SessionView for TerminalView {
    fn render_message(&mut self, message: &Message) {
        println!();
        println!("{}:", message.sender.display_name());
        for line in wrap_text(&message.content, TERMINAL_WIDTH - 2) {
            println!("  {}", line);
        }
    }

    fn update_clock(&mut self, clock: ClockSnapshot) {
        if !clock.total_running {
            return;
        }
        let reply_warning = clock.reply_running
            && matches!(clock.reply_remaining, 1..=5 | 10 | 30)
            && self.last_reply_shown != Some(clock.reply_remaining);
        let minute_mark = clock.total_remaining % 60 == 0
            && self.last_total_shown != Some(clock.total_remaining);
        if reply_warning || minute_mark {
            self.last_reply_shown = Some(clock.reply_remaining);
            self.last_total_shown = Some(clock.total_remaining);
            println!(
                "[debate {} | reply {}s]",
                format_clock(clock.total_remaining),
                clock.reply_remaining
            );
        }
    }

    fn set_start_enabled(&mut self, enabled: bool) {
        if enabled {
            println!("Type /start to begin the debate.");
        }
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        if enabled && !self.input_enabled {
            println!("Type your argument here... (/forfeit to give up)");
        }
        self.input_enabled = enabled;
    }

    fn set_typing(&mut self, typing: bool) {
        if typing {
            println!("Debato AI is thinking...");
        }
    }

    fn notify(&mut self, notice: &str) {
        println!("! {}", notice);
    }

    fn navigate(&mut self, destination: &Destination) {
        match destination {
            Destination::Results { .. } => println!("\nOpening your results..."),
            Destination::TrialEnded { winner } => {
                println!();
                println!("==============================================");
                println!("  Your free trial debate has ended ({} won).", winner.as_str().to_uppercase());
                println!("  Register to keep debating and track results.");
                println!("==============================================");
            }
        }
    }
}

/// Hand stdin over to a plain thread that forwards lines until EOF.
///
/// From here on every prompt reads from the returned receiver. The thread is
/// never joined, so a read still parked at exit does not hold the process.
fn spawn_line_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
        debug!("stdin reader finished");
    });
    rx
}

/// Next line, or `None` once stdin closed or the session stopped listening
async fn next_line(lines: &mut mpsc::Receiver<String>, actions: &mpsc::Sender<UserAction>) -> Option<String> {
    tokio::select! {
        line = lines.recv() => line,
        _ = actions.closed() => None,
    }
}

/// Turn lines into debate room actions until the session is over
async fn read_actions(lines: &mut mpsc::Receiver<String>, actions: mpsc::Sender<UserAction>) {
    while let Some(line) = next_line(lines, &actions).await {
        let action = match line.trim() {
            "/start" => UserAction::Start,
            "/forfeit" => {
                println!("{} [y/N]", FORFEIT_PROMPT);
                match next_line(lines, &actions).await {
                    Some(answer) => UserAction::Forfeit {
                        confirmed: answer.trim().eq_ignore_ascii_case("y"),
                    },
                    None => break,
                }
            }
            _ => UserAction::Submit(line),
        };
        if actions.send(action).await.is_err() {
            break;
        }
    }
}

async fn ask_yes_no(lines: &mut mpsc::Receiver<String>, prompt: &str, default: bool) -> bool {
    println!("{} [{}]", prompt, if default { "Y/n" } else { "y/N" });
    match lines.recv().await {
        Some(answer) => match answer.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => true,
            "n" | "no" => false,
            _ => default,
        },
        None => default,
    }
}

fn prompt_login() -> Result<LoginForm> {
    let username: String = Input::new().with_prompt("Username").interact_text()?;
    let password = Password::new().with_prompt("Password").interact()?;
    Ok(LoginForm { username, password })
}

fn prompt_register() -> Result<RegisterRequest> {
    let username: String = Input::new().with_prompt("Username").interact_text()?;
    let email: String = Input::new().with_prompt("Email").interact_text()?;
    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords don't match")
        .interact()?;
    let first_name: String = Input::new()
        .with_prompt("First name (optional)")
        .allow_empty(true)
        .interact_text()?;
    let last_name: String = Input::new()
        .with_prompt("Last name (optional)")
        .allow_empty(true)
        .interact_text()?;

    Ok(RegisterRequest {
        username,
        email,
        password_confirm: password.clone(),
        password,
        first_name,
        last_name,
    })
}

async fn register_until_done(api: &HttpDebateApi) -> Result<AuthUser> {
    loop {
        let form = prompt_register()?;
        match submit_register(api, &form).await {
            Ok(user) => return Ok(user),
            Err(e) => eprintln!("{}", e),
        }
    }
}

/// Returns the signed-in user, or `None` for a guest
async fn sign_in(api: &HttpDebateApi, config: &Config) -> Result<Option<AuthUser>> {
    if let Some((username, password)) = config.credentials() {
        let form = LoginForm {
            username: username.to_string(),
            password: password.to_string(),
        };
        return submit_login(api, &form)
            .await
            .map(Some)
            .map_err(|e| anyhow!("Automatic login failed: {}", e));
    }

    let status = api.auth_status().await?;
    if status.is_authenticated {
        return Ok(status.user);
    }

    loop {
        let choice = Select::new()
            .with_prompt("Welcome to Debato")
            .items(&["Log in", "Register", "Continue as guest"])
            .default(0)
            .interact()?;

        match choice {
            0 => {
                let form = prompt_login()?;
                match submit_login(api, &form).await {
                    Ok(user) => return Ok(Some(user)),
                    Err(e) => eprintln!("{}", e),
                }
            }
            1 => return register_until_done(api).await.map(Some),
            _ => return Ok(None),
        }
    }
}

async fn run_setup(api: Arc<HttpDebateApi>, authenticated: bool) -> Result<Debate> {
    let mut wizard = SetupWizard::new(api, authenticated);

    if wizard.guest_warning_visible() {
        println!("Guests get one free debate. Register to keep your results.");
        wizard.dismiss_guest_warning();
    }

    let categories = wizard.load_categories().await?.to_vec();
    if categories.is_empty() {
        return Err(anyhow!("No categories available"));
    }

    loop {
        match wizard.step() {
            SetupStep::Category => {
                let labels: Vec<String> = categories
                    .iter()
                    .map(|c| format!("{} ({} topics)", c.name, c.topics_count))
                    .collect();
                let index = Select::new()
                    .with_prompt(format!("[{}%] Choose a category", wizard.progress_percent()))
                    .items(&labels)
                    .default(0)
                    .interact()?;
                let loaded = wizard.select_category(categories[index].id).await.map(|_| ());
                match loaded {
                    Ok(()) => wizard.go_to_step(SetupStep::Topic)?,
                    Err(e) => eprintln!("{}", e),
                }
            }
            SetupStep::Topic => {
                let topics = wizard.topics().to_vec();
                let mut labels: Vec<String> = topics
                    .iter()
                    .map(|t| format!("{} [{}] {}", t.title, t.difficulty_level.label(), truncate(&t.description, 50)))
                    .collect();
                labels.push("<- Back to categories".to_string());
                let index = Select::new()
                    .with_prompt(format!("[{}%] Choose a topic", wizard.progress_percent()))
                    .items(&labels)
                    .default(0)
                    .interact()?;
                if index == topics.len() {
                    wizard.go_to_step(SetupStep::Category)?;
                    continue;
                }
                wizard.select_topic(topics[index].id)?;
                wizard.go_to_step(SetupStep::Settings)?;
            }
            SetupStep::Settings => {
                let labels: Vec<String> = Difficulty::ALL
                    .iter()
                    .map(|d| format!("{} ({}s per reply)", d.label(), d.reply_budget_secs()))
                    .collect();
                let default_difficulty = Difficulty::ALL
                    .iter()
                    .position(|d| *d == wizard.difficulty())
                    .unwrap_or(1);
                let index = Select::new()
                    .with_prompt(format!("[{}%] Difficulty", wizard.progress_percent()))
                    .items(&labels)
                    .default(default_difficulty)
                    .interact()?;
                wizard.select_difficulty(Difficulty::ALL[index]);

                let labels: Vec<String> = TIME_CHOICES.iter().map(|m| format!("{} minutes", m)).collect();
                let default_time = TIME_CHOICES
                    .iter()
                    .position(|m| *m == wizard.time_minutes())
                    .unwrap_or(1);
                let index = Select::new()
                    .with_prompt("Total debate time")
                    .items(&labels)
                    .default(default_time)
                    .interact()?;
                wizard.select_time(TIME_CHOICES[index])?;

                match wizard.create_debate().await {
                    Ok(debate) => return Ok(debate),
                    Err(e) => {
                        eprintln!("{}", e);
                        if !Confirm::new().with_prompt("Try again?").default(true).interact()? {
                            return Err(anyhow!(e));
                        }
                    }
                }
            }
        }
    }
}

/// Guests get one debate; stop before setup if it was already used
async fn ensure_trial_available(api: &HttpDebateApi) -> Result<()> {
    match api.dashboard().await {
        Ok(dashboard) if dashboard.can_debate == Some(false) => Err(anyhow!(
            "Your free debate has been used. Register to keep debating."
        )),
        Ok(_) => Ok(()),
        Err(e) => {
            warn!("Could not check guest trial state: {}", e);
            Ok(())
        }
    }
}

async fn show_results(api: &HttpDebateApi, winner: Winner) {
    match winner {
        Winner::User => println!("You won this one."),
        Winner::Ai => println!("The AI took this round."),
    }

    match api.dashboard().await {
        Ok(dashboard) => {
            if let Some(score) = dashboard.scoreboard {
                println!(
                    "You {} - {} AI  ({} debates, {:.2}% win rate)",
                    score.user_wins, score.ai_wins, score.total_debates, score.win_rate
                );
            }
        }
        Err(e) => warn!("Could not load scoreboard: {}", e),
    }

    match api.history().await {
        Ok(history) => {
            println!("\nRecent debates:");
            for entry in history.iter().take(5) {
                let winner = entry.winner.map(|w| w.as_str().to_uppercase()).unwrap_or_else(|| "-".to_string());
                println!(
                    "  #{:<5} {:<40} {:<6} {:.1} min",
                    entry.id,
                    truncate(&entry.topic_title, 40),
                    winner,
                    entry.duration
                );
            }
        }
        Err(e) => warn!("Could not load debate history: {}", e),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting debato against {}", config.api_url);

    let api = Arc::new(HttpDebateApi::new(&config)?);
    let user = sign_in(&api, &config).await?;
    let authenticated = user.is_some();
    if let Some(user) = &user {
        println!("Signed in as {}", user.username);
    }

    let debate = match std::env::args().nth(1) {
        Some(raw) => {
            let id: u64 = raw.parse().map_err(|_| anyhow!("Debate id must be a number, got '{}'", raw))?;
            api.get_debate(id).await?
        }
        None => {
            if !authenticated {
                ensure_trial_available(&api).await?;
            }
            run_setup(api.clone(), authenticated).await?
        }
    };

    if debate.status != DebateStatus::Pending {
        return Err(anyhow!("Debate {} is not waiting to start ({:?})", debate.id, debate.status));
    }

    println!();
    println!(
        "Topic: {}",
        debate.topic_title.as_deref().unwrap_or("(untitled)")
    );
    println!(
        "Time: {} total, {}s per reply",
        format_clock(debate.total_budget_secs()),
        debate.reply_time_limit
    );

    let session = DebateSession::new(SessionConfig::from_debate(&debate, authenticated), TerminalView::new());
    let mut lines = spawn_line_reader();
    let (tx, rx) = mpsc::channel(16);
    let driver = SessionDriver::new(session, api.clone()).run(rx);
    let (report, ()) = tokio::join!(driver, read_actions(&mut lines, tx));

    let user_turns = report.transcript.iter().filter(|m| m.sender == Sender::User).count();
    info!("Session finished after {} user messages", user_turns);

    match report.destination {
        Some(destination @ Destination::Results { .. }) => show_results(&api, destination.winner()).await,
        Some(Destination::TrialEnded { .. }) => {
            println!("Run debato again and choose Register to keep debating.");
        }
        None => println!("Debate was not started."),
    }

    if authenticated && ask_yes_no(&mut lines, "Log out?", false).await {
        if let Err(e) = submit_logout(&api).await {
            eprintln!("{}", e);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_actions_maps_commands() {
        let (line_tx, mut lines) = mpsc::channel(8);
        let (tx, mut rx) = mpsc::channel(8);
        for line in ["/start", "AI is overrated", "/forfeit", "y"] {
            line_tx.send(line.to_string()).await.unwrap();
        }
        drop(line_tx);

        read_actions(&mut lines, tx).await;

        assert_eq!(rx.recv().await, Some(UserAction::Start));
        assert_eq!(rx.recv().await, Some(UserAction::Submit("AI is overrated".to_string())));
        assert_eq!(rx.recv().await, Some(UserAction::Forfeit { confirmed: true }));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_read_actions_stops_when_session_ends_and_keeps_lines() {
        let (line_tx, mut lines) = mpsc::channel(8);
        let (tx, rx) = mpsc::channel(8);
        // Session over while no input is pending
        drop(rx);

        read_actions(&mut lines, tx).await;

        // The same line source still serves the follow-up prompts
        line_tx.send("y".to_string()).await.unwrap();
        assert!(ask_yes_no(&mut lines, "Log out?", false).await);
        drop(line_tx);
        assert!(ask_yes_no(&mut lines, "Log out?", true).await);
    }
}
