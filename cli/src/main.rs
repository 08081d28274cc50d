use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use taskflow::api::HttpBoardApi;
use taskflow::api::auth::{self, Registration};
use taskflow::config::ConfigError;
use taskflow::types::{Board, CardCreate, CardUpdate, Priority};
use taskflow::{ApiError, BoardCoordinator, BoardError, BoardEvent, ClientConfig, Session};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("missing session token; pass --session-token or set TASKFLOW_SESSION_TOKEN")]
    MissingSessionToken,
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("request failed: {0}")]
    Api(#[from] ApiError),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "taskflow", about = "TaskFlow kanban board CLI")]
struct Cli {
    #[arg(long, env = "TASKFLOW_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "TASKFLOW_SESSION_TOKEN")]
    session_token: Option<String>,

    #[arg(long, env = "TASKFLOW_USER_ID", help = "Author recorded on added comments")]
    user_id: Option<Uuid>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone)]
struct CliContext {
    config: ClientConfig,
    session_token: Option<String>,
    user_id: Option<Uuid>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and print the session token.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Board(BoardCommand),
    Card(CardCommand),
    Comment(CommentCommand),
}

#[derive(Args, Debug)]
struct BoardCommand {
    #[command(subcommand)]
    command: BoardSubcommand,
}

#[derive(Subcommand, Debug)]
enum BoardSubcommand {
    List,
    Show { board_id: Uuid },
}

#[derive(Args, Debug)]
struct CardCommand {
    #[command(subcommand)]
    command: CardSubcommand,
}

#[derive(Subcommand, Debug)]
enum CardSubcommand {
    Create {
        board_id: Uuid,
        #[arg(long)]
        column: Uuid,
        #[arg(long)]
        title: String,
        #[arg(long, default_value_t = Priority::Medium)]
        priority: Priority,
        #[arg(long, help = "Due date, YYYY-MM-DD")]
        due_date: Option<NaiveDate>,
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=100))]
        completion: u8,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        assignee: Option<Uuid>,
    },
    /// Move a card to another column and wait for the backend to confirm.
    Move {
        board_id: Uuid,
        card_id: Uuid,
        column_id: Uuid,
    },
    Update {
        board_id: Uuid,
        card_id: Uuid,
        #[command(flatten)]
        fields: CardFields,
    },
    Delete {
        board_id: Uuid,
        card_id: Uuid,
    },
    Complete {
        board_id: Uuid,
        card_id: Uuid,
    },
}

#[derive(Args, Debug)]
struct CardFields {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    priority: Option<Priority>,
    #[arg(long)]
    due_date: Option<NaiveDate>,
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    completion: Option<u8>,
    #[arg(long)]
    assignee: Option<Uuid>,
    #[arg(long)]
    column: Option<Uuid>,
}

impl From<CardFields> for CardUpdate {
    fn from(fields: CardFields) -> Self {
        Self {
            title: fields.title,
            description: fields.description,
            priority: fields.priority,
            due_date: fields.due_date,
            completion_percentage: fields.completion,
            column_id: fields.column,
            assignee_id: fields.assignee,
        }
    }
}

#[derive(Args, Debug)]
struct CommentCommand {
    #[command(subcommand)]
    command: CommentSubcommand,
}

#[derive(Subcommand, Debug)]
enum CommentSubcommand {
    List {
        board_id: Uuid,
        card_id: Uuid,
    },
    Add {
        board_id: Uuid,
        card_id: Uuid,
        #[arg(long)]
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = cli.base_url.as_deref() {
        config = config.with_base_url(base_url)?;
    }
    tracing::debug!(base_url = %config.base_url, "client configured");
    let ctx = CliContext { config, session_token: cli.session_token, user_id: cli.user_id };

    match cli.command {
        Command::Login { email, password } => run_login(&ctx, &email, &password).await,
        Command::Register { first_name, last_name, email, password } => {
            let registration = Registration::new(&first_name, &last_name, &email, &password);
            let user = auth::register(&ctx.config, &registration).await?;
            print_json(&user)
        }
        Command::Board(board) => run_board(&ctx, board).await,
        Command::Card(card) => run_card(&ctx, card).await,
        Command::Comment(comment) => run_comment(&ctx, comment).await,
    }
}

impl CliContext {
    fn session(&self) -> Result<Session, CliError> {
        let token = self.session_token.as_deref().ok_or(CliError::MissingSessionToken)?;
        let session = Session::new(token);
        Ok(match self.user_id {
            Some(user_id) => session.with_user_id(user_id),
            None => session,
        })
    }

    fn coordinator(&self) -> Result<BoardCoordinator, CliError> {
        let api = HttpBoardApi::new(&self.config, self.session()?)?;
        Ok(BoardCoordinator::from_config(Arc::new(api), &self.config))
    }

    /// Coordinator with `board_id` loaded.
    async fn open(&self, board_id: Uuid) -> Result<(BoardCoordinator, Board), CliError> {
        let coordinator = self.coordinator()?;
        let board = coordinator.load_board(board_id).await?;
        Ok((coordinator, board))
    }
}

async fn run_login(cli: &CliContext, email: &str, password: &str) -> Result<(), CliError> {
    let session = auth::login(&cli.config, email, password).await?;
    if let Some(email) = session.email() {
        eprintln!("signed in as {email}");
    }
    println!("{}", session.token());
    Ok(())
}

async fn run_board(cli: &CliContext, board: BoardCommand) -> Result<(), CliError> {
    match board.command {
        BoardSubcommand::List => {
            let boards = cli.coordinator()?.list_boards().await?;
            print_json(&boards)
        }
        BoardSubcommand::Show { board_id } => {
            let (_, board) = cli.open(board_id).await?;
            print_json(&board)
        }
    }
}

async fn run_card(cli: &CliContext, card: CardCommand) -> Result<(), CliError> {
    match card.command {
        CardSubcommand::Create { board_id, column, title, priority, due_date, completion, description, assignee } => {
            let (coordinator, board) = cli.open(board_id).await?;
            if board.column(column).is_none() {
                return Err(BoardError::ColumnNotFound(column).into());
            }
            let request = CardCreate {
                title,
                description,
                priority,
                due_date,
                completion_percentage: completion,
                column_id: column,
                assignee_id: assignee,
            };
            let card = coordinator.create_card(&request).await?;
            print_json(&card)
        }
        CardSubcommand::Move { board_id, card_id, column_id } => move_card(cli, board_id, card_id, column_id).await,
        CardSubcommand::Update { board_id, card_id, fields } => {
            let (coordinator, _) = cli.open(board_id).await?;
            let card = coordinator.update_card(card_id, &fields.into()).await?;
            print_json(&card)
        }
        CardSubcommand::Delete { board_id, card_id } => {
            let (coordinator, _) = cli.open(board_id).await?;
            coordinator.delete_card(card_id).await?;
            eprintln!("deleted card {card_id}");
            Ok(())
        }
        CardSubcommand::Complete { board_id, card_id } => {
            let (coordinator, _) = cli.open(board_id).await?;
            coordinator.complete_card(card_id).await?;
            eprintln!("completed card {card_id}");
            Ok(())
        }
    }
}

async fn move_card(cli: &CliContext, board_id: Uuid, card_id: Uuid, column_id: Uuid) -> Result<(), CliError> {
    let (coordinator, board) = cli.open(board_id).await?;
    if board.card(card_id).is_none() {
        return Err(BoardError::CardNotFound(card_id).into());
    }
    if board.column(column_id).is_none() {
        return Err(BoardError::ColumnNotFound(column_id).into());
    }

    let mut events = coordinator.subscribe();
    let Some(pending) = coordinator.move_card(card_id, column_id).await else {
        eprintln!("card {card_id} is already in column {column_id}");
        return Ok(());
    };

    let outcome = pending.settle().await;
    while let Ok(event) = events.try_recv() {
        if let BoardEvent::MoveRejected { notice, .. } = event {
            eprintln!("{}", notice.message);
        }
    }
    if let Some(board) = coordinator.board().await {
        print_layout(&board);
    }
    outcome?;
    Ok(())
}

async fn run_comment(cli: &CliContext, comment: CommentCommand) -> Result<(), CliError> {
    match comment.command {
        CommentSubcommand::List { board_id, card_id } => {
            let (coordinator, _) = cli.open(board_id).await?;
            let comments = coordinator.list_comments(card_id).await?;
            print_json(&comments)
        }
        CommentSubcommand::Add { board_id, card_id, text } => {
            let (coordinator, _) = cli.open(board_id).await?;
            let author = cli.session()?.user_id();
            let comment = coordinator.add_comment(card_id, &text, author).await?;
            print_json(&comment)
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

fn print_layout(board: &Board) {
    println!("{}", board.name);
    for column in &board.columns {
        println!("  {} ({})", column.name, column.cards.len());
        for card in &column.cards {
            println!("    - {} [{}] {}%  {}", card.title, card.priority, card.completion_percentage, card.id);
        }
    }
}
