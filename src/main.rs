use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mockmate::{ApiClient, Config, Difficulty, InterviewClient, Score, ServerEvent};
use std::io::Write as _;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::info;

#[derive(Parser)]
#[command(name = "mockmate", about = "Interview practice sessions from the terminal")]
struct Cli {
    /// Config file path, without extension
    #[arg(long, default_value = "config/mockmate")]
    config: String,

    /// Bearer token, overriding the configured one
    #[arg(long)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run an algorithm interview
    Algorithm {
        /// easy, medium or hard
        #[arg(long, default_value = "medium")]
        difficulty: Difficulty,
    },

    /// Run a system-design interview
    SystemDesign {
        /// Scenario id (see `scenarios`)
        #[arg(long)]
        scenario: String,
    },

    /// Run a workplace-scenario interview
    Workplace {
        /// Scenario id (see `scenarios`)
        #[arg(long)]
        scenario: String,
    },

    /// List available interview scenarios
    Scenarios {
        /// "system-design" or "workplace"
        #[arg(long, default_value = "system-design")]
        kind: String,
    },

    /// Show past training sessions
    History {
        #[arg(long, default_value_t = 0)]
        skip: usize,
        #[arg(long, default_value_t = 20)]
        limit: usize,
        /// Show the full transcript of one session
        #[arg(long)]
        show: Option<String>,
        /// Delete one session
        #[arg(long)]
        delete: Option<String>,
    },

    /// Create an account and print the bearer token
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Log in and print the bearer token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Show the authenticated user's profile
    Whoami,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("{} v0.1.0", cfg.service.name);
    info!("Interview service at {}", cfg.api.base_url);

    let mut api = ApiClient::from_config(&cfg)?;
    if let Some(token) = cli.token {
        api = api.with_token(token);
    }

    match cli.command {
        Command::Algorithm { difficulty } => {
            let mut client = InterviewClient::new(api);
            let session = client
                .start_algorithm(difficulty)
                .await
                .context("could not start the interview")?;
            run_interview(&mut client, session).await?;
        }
        Command::SystemDesign { scenario } => {
            let mut client = InterviewClient::new(api);
            let session = client
                .start_system_design(&scenario)
                .await
                .context("could not start the interview")?;
            run_interview(&mut client, session).await?;
        }
        Command::Workplace { scenario } => {
            let mut client = InterviewClient::new(api);
            let session = client
                .start_workplace(&scenario)
                .await
                .context("could not start the interview")?;
            run_interview(&mut client, session).await?;
        }
        Command::Scenarios { kind } => list_scenarios(&api, &kind).await?,
        Command::History {
            skip,
            limit,
            show,
            delete,
        } => {
            if let Some(id) = delete {
                api.delete_session(&id).await?;
                println!("deleted {id}");
            } else if let Some(id) = show {
                show_session(&api, &id).await?;
            } else {
                show_history(&api, skip, limit).await?;
            }
        }
        Command::Register {
            name,
            email,
            password,
        } => {
            let auth = api.register(&name, &email, &password).await?;
            println!("welcome, {}", auth.user.name);
            println!("token: {}", auth.access_token);
        }
        Command::Login { email, password } => {
            let auth = api.login(&email, &password).await?;
            println!("welcome back, {}", auth.user.name);
            println!("token: {}", auth.access_token);
        }
        Command::Whoami => {
            let user = api.current_user().await?;
            println!("{} <{}>", user.name, user.email);
            if let Some(role) = user.current_role {
                println!("role: {role}");
            }
            if let Some(target) = user.target_role {
                println!("target: {target}");
            }
        }
    }

    Ok(())
}

/// Drive one interview from the terminal until the operator (or the
/// interviewer) ends it, then print the evaluation report.
async fn run_interview(
    client: &mut InterviewClient,
    session: std::sync::Arc<mockmate::InterviewSession>,
) -> Result<()> {
    let snapshot = session.snapshot().await;
    println!("--- {} interview ---", session.kind().as_path());
    if let Some(stage) = &snapshot.stage {
        println!("[stage: {stage}]");
    }
    println!("\ninterviewer: {}", snapshot.turns[0].content);
    println!("\nType your answers. /end finishes the interview, /quit abandons it.");

    // Render streamed events as they are applied to the session.
    let mut updates = session.updates();
    let printer = tokio::spawn(async move {
        loop {
            match updates.recv().await {
                Ok(ServerEvent::MessageStart) => {
                    print!("\ninterviewer: ");
                    std::io::stdout().flush().ok();
                }
                Ok(ServerEvent::MessageChunk { content }) => {
                    print!("{content}");
                    std::io::stdout().flush().ok();
                }
                Ok(ServerEvent::MessageComplete { stage, .. }) => {
                    println!();
                    if let Some(stage) = stage {
                        println!("[stage: {stage}]");
                    }
                }
                Ok(ServerEvent::Error { message }) => {
                    eprintln!("\n[server error: {message}]");
                }
                Ok(ServerEvent::Evaluating) => {
                    println!("\n[the interviewer is writing your evaluation...]");
                }
                Ok(ServerEvent::SessionComplete { .. }) => break,
                Ok(_) => {}
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    });

    // Watch for the interviewer ending the session on its own.
    let mut control = session.updates();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut finish = true;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.trim() {
                    "" => continue,
                    "/end" => break,
                    "/quit" => {
                        finish = false;
                        break;
                    }
                    text => {
                        if !session.submit_turn(text, None).await? {
                            println!("[wait for the interviewer to finish]");
                        }
                    }
                }
            }
            event = control.recv() => {
                match event {
                    Ok(ServerEvent::MessageComplete { completed: true, .. })
                    | Ok(ServerEvent::SessionComplete { .. }) => break,
                    Err(RecvError::Closed) => break,
                    _ => continue,
                }
            }
        }
    }

    if finish {
        match client.end().await {
            Ok(score) => print_report(&score),
            Err(e) => eprintln!("could not end the interview: {e}"),
        }
    }

    client.dispose().await;
    printer.abort();

    Ok(())
}

fn print_report(score: &Score) {
    println!("\n=== Evaluation report ===");

    match score {
        Score::Algorithm(s) => {
            println!("algorithm:      {}/10", s.algorithm);
            println!("code quality:   {}/10", s.code_quality);
            println!("complexity:     {}/10", s.complexity);
            println!("edge cases:     {}/10", s.edge_cases);
            println!("communication:  {}/10", s.communication);
        }
        Score::SystemDesign(s) => {
            println!("requirements:   {}/10", s.requirements);
            println!("architecture:   {}/10", s.architecture);
            println!("tech stack:     {}/10", s.tech_stack);
            println!("scalability:    {}/10", s.scalability);
            println!("availability:   {}/10", s.availability);
            println!("consistency:    {}/10", s.consistency);
            print_list("Strengths", &s.strengths);
        }
        Score::Workplace(s) => {
            println!("technical depth:        {}/10", s.technical_depth);
            println!("business understanding: {}/10", s.business_understanding);
            println!("communication:          {}/10", s.communication);
            println!("logical thinking:       {}/10", s.logical_thinking);
            print_list("Strengths", &s.strengths);
        }
    }

    println!("overall:        {}/10", score.overall());
    println!("\n{}", score.feedback());
    print_list("Improvements", score.improvements());
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("\n{title}:");
    for item in items {
        println!("  - {item}");
    }
}

async fn list_scenarios(api: &ApiClient, kind: &str) -> Result<()> {
    match kind {
        "system-design" => {
            for s in api.system_design_scenarios().await? {
                println!("{}: {}", s.id, s.title);
                println!("    {}", s.description);
            }
        }
        "workplace" => {
            for s in api.workplace_scenarios().await? {
                println!("{}: {} ({})", s.id, s.name, s.role);
                println!("    {}", s.description);
            }
        }
        other => anyhow::bail!("unknown scenario kind: {other}"),
    }
    Ok(())
}

async fn show_history(api: &ApiClient, skip: usize, limit: usize) -> Result<()> {
    let history = api.history(skip, limit, None).await?;
    println!("{} sessions total", history.total);
    for entry in history.sessions {
        let when = entry.created_at.format("%Y-%m-%d %H:%M");
        let label = entry
            .difficulty
            .or(entry.scenario_id)
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{}  {}  {:?}  {}",
            entry.id,
            when,
            entry.status,
            format!("{} ({})", entry.kind.as_path(), label),
        );
    }
    Ok(())
}

async fn show_session(api: &ApiClient, id: &str) -> Result<()> {
    let detail = api.session_detail(id).await?;
    println!(
        "{} interview from {}",
        detail.kind.as_path(),
        detail.created_at.format("%Y-%m-%d %H:%M")
    );
    for turn in detail.messages {
        println!("\n{}: {}", turn.role, turn.content);
    }
    if let Some(score) = detail.score {
        if let Ok(score) = Score::from_value(detail.kind, score) {
            print_report(&score);
        }
    }
    Ok(())
}
