use std::{error::Error, io::Write};

use clap::{Args, Parser, Subcommand};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use engine::{Engine, NewPropertyCmd, OwnershipRole, UpsertOwnershipCmd, money::format_cents};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

mod users {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "users")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub username: String,
        pub password: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

#[derive(Parser, Debug)]
#[command(name = "baita_admin")]
#[command(about = "Admin utilities for Baita (bootstrap users/properties)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./baita.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Property(Property),
    Ownership(Ownership),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
}

#[derive(Args, Debug)]
struct Property {
    #[command(subcommand)]
    command: PropertyCommand,
}

#[derive(Subcommand, Debug)]
enum PropertyCommand {
    Create(PropertyCreateArgs),
}

#[derive(Args, Debug)]
struct PropertyCreateArgs {
    #[arg(long)]
    owner: String,
    #[arg(long)]
    name: String,
    #[arg(long, default_value_t = 0)]
    nightly_rate_cents: i64,
    #[arg(long, default_value_t = 0)]
    cleaning_fee_cents: i64,
    #[arg(long, default_value_t = 1)]
    min_nights: i64,
}

#[derive(Args, Debug)]
struct Ownership {
    #[command(subcommand)]
    command: OwnershipCommand,
}

#[derive(Subcommand, Debug)]
enum OwnershipCommand {
    Add(OwnershipAddArgs),
}

#[derive(Args, Debug)]
struct OwnershipAddArgs {
    /// Primary owner performing the change.
    #[arg(long)]
    owner: String,
    #[arg(long)]
    property_id: Uuid,
    #[arg(long)]
    username: String,
    #[arg(long)]
    share_bps: i64,
    #[arg(long)]
    voting_power: i64,
    #[arg(long, default_value = "owner")]
    role: String,
    #[arg(long, default_value_t = false)]
    blackout_manager: bool,
    #[arg(long, default_value_t = false)]
    expense_approver: bool,
}

fn parse_role(raw: &str) -> Result<OwnershipRole, String> {
    match raw {
        "primary" => Ok(OwnershipRole::Primary),
        "owner" => Ok(OwnershipRole::Owner),
        "caretaker" => Ok(OwnershipRole::Caretaker),
        other => Err(format!("unsupported role: {other}")),
    }
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self, Box<dyn Error + Send + Sync>> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn prompt_password(prompt: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
    let _raw = RawModeGuard::enter()?;

    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;
    out.flush()?;

    let mut buf = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        match code {
            KeyCode::Enter => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                break;
            }
            KeyCode::Backspace => {
                if buf.pop().is_some() {
                    execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
                    out.flush()?;
                }
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                return Err("interrupted".into());
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                buf.push(ch);
                execute!(out, Print("*"))?;
                out.flush()?;
            }
            _ => {}
        }
    }

    Ok(buf)
}

fn prompt_password_twice() -> Result<String, Box<dyn Error + Send + Sync>> {
    let mut out = std::io::stderr();
    for _ in 0..3 {
        let p1 = prompt_password("Password: ")?;
        if p1.is_empty() {
            execute!(
                out,
                cursor::MoveToColumn(0),
                terminal::Clear(ClearType::CurrentLine),
                Print("Password must not be empty.\r\n")
            )?;
            continue;
        }

        let p2 = prompt_password("Confirm password: ")?;
        if p1 == p2 {
            return Ok(p1);
        }

        execute!(
            out,
            cursor::MoveToColumn(0),
            terminal::Clear(ClearType::CurrentLine),
            Print("Passwords do not match. Try again.\r\n")
        )?;
    }

    Err("too many attempts".into())
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let password = prompt_password_twice()?;

            if users::Entity::find_by_id(args.username.clone())
                .one(&db)
                .await?
                .is_some()
            {
                eprintln!("user already exists: {}", args.username);
                std::process::exit(1);
            }

            let user = users::ActiveModel {
                username: Set(args.username.clone()),
                password: Set(password),
            };
            users::Entity::insert(user).exec(&db).await?;

            println!("created user: {}", args.username);
        }
        Command::Property(Property {
            command: PropertyCommand::Create(args),
        }) => {
            if users::Entity::find_by_id(args.owner.clone())
                .one(&db)
                .await?
                .is_none()
            {
                eprintln!("user not found: {}", args.owner);
                std::process::exit(1);
            }

            let engine = Engine::builder().database(db.clone()).build().await?;
            let cmd = NewPropertyCmd::new(&args.name, &args.owner)
                .nightly_rate_cents(args.nightly_rate_cents)
                .cleaning_fee_cents(args.cleaning_fee_cents)
                .min_nights(args.min_nights);
            let property = engine.new_property(cmd).await?;
            println!(
                "created property: {} ({}) at {}/night",
                property.name,
                property.id,
                format_cents(property.nightly_rate_cents)
            );
        }
        Command::Ownership(Ownership {
            command: OwnershipCommand::Add(args),
        }) => {
            let role = match parse_role(&args.role) {
                Ok(v) => v,
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(2);
                }
            };

            let engine = Engine::builder().database(db.clone()).build().await?;
            let cmd = UpsertOwnershipCmd::new(
                args.property_id,
                &args.owner,
                &args.username,
                args.share_bps,
                args.voting_power,
            )
            .role(role)
            .blackout_manager(args.blackout_manager)
            .expense_approver(args.expense_approver);
            let ownership = engine.upsert_ownership(cmd).await?;
            println!(
                "ownership for {}: {} bps, voting power {}",
                ownership.user_id, ownership.share_bps, ownership.voting_power
            );
        }
    }

    Ok(())
}
