//! Timesheet CLI: submit work records and, as the owner, download reports
//! and generate invoices.
//!
//! Configuration comes from the environment (or `.env`): TIMESHEET_API_URL,
//! TIMESHEET_API_VERSION, OWNER_USERNAME, OWNER_PASSWORD, DOWNLOAD_DIR.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use timesheet_api_client::{ApiClient, TimesheetService};
use timesheet_cli::shell::{Reply, Shell, ShellContext};
use timesheet_cli::views::{DashboardView, FormView, InvoiceView};
use timesheet_cli::{drain_notifications, init_tracing, render_notification};
use timesheet_core::{
    compute_hours, Authenticator, ClientConfig, Credentials, NotificationCenter,
    NotificationTiming, StaticAuthenticator,
};
use timesheet_uploads::SystemViewer;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;

#[derive(Parser)]
#[command(name = "timesheet", about = "Timesheet and invoicing client")]
struct Cli {
    /// Directory downloads are saved to (overrides DOWNLOAD_DIR)
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute worked hours between two clock times (HH:MM)
    Hours {
        clock_in: String,
        clock_out: String,
    },
    /// Submit a timesheet entry
    Submit {
        #[arg(long)]
        employee_id: String,
        #[arg(long)]
        name: String,
        /// Work date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        #[arg(long)]
        clock_in: String,
        #[arg(long)]
        clock_out: String,
        #[arg(long)]
        project: String,
        #[arg(long)]
        task_description: String,
    },
    /// Download all timesheets as timesheets.xlsx (owner only)
    DownloadTimesheets {
        #[command(flatten)]
        owner: OwnerArgs,
    },
    /// Generate an invoice PDF from an Excel file (owner only)
    Invoice {
        /// Path to the .xlsx or .xls file
        file: PathBuf,
        #[command(flatten)]
        owner: OwnerArgs,
    },
    /// Interactive client with screens for the form, login, dashboard and invoices
    Shell,
}

#[derive(clap::Args)]
struct OwnerArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    password: String,
}

async fn sign_in(config: &ClientConfig, owner: OwnerArgs) -> anyhow::Result<()> {
    StaticAuthenticator::from_config(config)
        .authenticate(&Credentials::new(owner.username, owner.password))
        .await?;
    Ok(())
}

async fn run_shell(
    config: ClientConfig,
    service: Arc<dyn TimesheetService>,
    notifications: NotificationCenter,
) -> anyhow::Result<()> {
    let mut events = notifications.subscribe();
    let printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    if let Some(line) = render_notification(&event) {
                        println!("{}", line);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Missed notifications");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let ctx = ShellContext {
        authenticator: Arc::new(StaticAuthenticator::from_config(&config)),
        config,
        service,
        notifications,
        viewer: Arc::new(SystemViewer),
    };
    let mut shell = Shell::new(ctx);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", shell.banner());
    loop {
        print!("> ");
        std::io::stdout().flush().context("Failed to write prompt")?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };

        match shell.handle_line(&line).await {
            Reply::Quit => break,
            Reply::Text(text) if !text.is_empty() => println!("{}", text),
            Reply::Text(_) => {}
        }
    }

    printer.abort();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    if let Commands::Hours {
        clock_in,
        clock_out,
    } = &cli.command
    {
        println!("{:.2}", compute_hours(clock_in, clock_out));
        return Ok(());
    }

    let mut config = ClientConfig::from_env().context("Invalid configuration")?;
    if let Some(dir) = cli.output_dir {
        config.download_dir = dir;
    }

    let notifications = NotificationCenter::new(NotificationTiming::from(&config));
    let mut events = notifications.subscribe();
    let service: Arc<dyn TimesheetService> = Arc::new(
        ApiClient::from_config(&config).context("Failed to create API client")?,
    );

    let interactive = matches!(cli.command, Commands::Shell);
    let outcome = match cli.command {
        Commands::Hours { .. } => Ok(()),
        Commands::Submit {
            employee_id,
            name,
            date,
            clock_in,
            clock_out,
            project,
            task_description,
        } => {
            let mut form = FormView::new(service, notifications.clone());
            for (field, value) in [
                ("employeeId", employee_id),
                ("name", name),
                ("date", date),
                ("clockIn", clock_in),
                ("clockOut", clock_out),
                ("project", project),
                ("taskDescription", task_description),
            ] {
                form.set_field(field, &value)?;
            }
            form.submit().await.map_err(anyhow::Error::from)
        }
        Commands::DownloadTimesheets { owner } => {
            sign_in(&config, owner).await?;
            let mut dashboard =
                DashboardView::new(service, notifications.clone(), config.download_dir.clone());
            dashboard
                .download_timesheets()
                .await
                .map(|path| println!("{}", path.display()))
                .map_err(anyhow::Error::from)
        }
        Commands::Invoice { file, owner } => {
            sign_in(&config, owner).await?;
            let mut view = InvoiceView::with_policy(
                config.max_upload_size_bytes,
                service,
                notifications.clone(),
                Arc::new(SystemViewer),
                config.download_dir.clone(),
            );
            match view.add_path(&file).await {
                Ok(id) => {
                    view.uploads().wait_until_complete(id).await;
                    view.generate()
                        .await
                        .map(|path| println!("{}", path.display()))
                        .map_err(anyhow::Error::from)
                }
                Err(e) => Err(e.into()),
            }
        }
        Commands::Shell => run_shell(config, service, notifications.clone()).await,
    };

    if !interactive {
        drain_notifications(&mut events);
    }
    outcome
}
