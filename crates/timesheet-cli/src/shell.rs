//! Interactive navigation shell.
//!
//! Shows exactly one screen at a time and routes each input line to it.
//! Switching screens drops the previous screen's state, which cancels its
//! upload tickers and deletes any temporary view files it held.
//!
//! Outcomes that views already report through the notification center get
//! an empty reply here so they are not printed twice.

use std::path::Path;
use std::sync::Arc;

use timesheet_api_client::TimesheetService;
use timesheet_core::{
    format_file_size, AppError, Authenticator, ClientConfig, ErrorMetadata, NotificationCenter,
    TimesheetField, UploadState, UploadedFile, ValidationError,
};
use timesheet_uploads::Viewer;

use crate::truncate_string;
use crate::views::{AttachmentsView, DashboardView, FormView, InvoiceView, LoginView};

const MAX_NAME_WIDTH: usize = 40;

/// Shared dependencies every screen is built from.
#[derive(Clone)]
pub struct ShellContext {
    pub config: ClientConfig,
    pub service: Arc<dyn TimesheetService>,
    pub authenticator: Arc<dyn Authenticator>,
    pub notifications: NotificationCenter,
    pub viewer: Arc<dyn Viewer>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    Home,
    Login,
    Dashboard,
    Invoice,
}

impl ScreenKind {
    pub fn title(&self) -> &'static str {
        match self {
            ScreenKind::Home => "Timesheet",
            ScreenKind::Login => "Owner Login",
            ScreenKind::Dashboard => "Owner Dashboard",
            ScreenKind::Invoice => "Invoice Generator",
        }
    }

    fn help(&self) -> &'static str {
        match self {
            ScreenKind::Home => {
                "\
  show                      show the timesheet form
  set <field> <value>       fill in a field (employeeId, name, date, clockIn,
                            clockOut, project, taskDescription)
  submit                    submit the timesheet
  clear                     clear the form
  attach <path>...          attach PDF or Excel files (quote paths with spaces)
  files                     list attachments
  remove <n>                remove attachment n
  view <n>                  open attachment n
  close                     delete the temporary copies of opened attachments
  owner                     go to the owner login"
            }
            ScreenKind::Login => {
                "\
  username <name>           enter the username
  password <password>       enter the password
  login                     sign in
  back                      return to the timesheet"
            }
            ScreenKind::Dashboard => {
                "\
  download                  download all timesheets (timesheets.xlsx)
  invoice                   open the invoice generator
  back                      return to the timesheet"
            }
            ScreenKind::Invoice => {
                "\
  upload <path>             choose the Excel file (.xlsx, .xls)
  status                    show the upload
  wait                      wait for the upload to finish
  view                      open the uploaded file
  close                     delete the temporary copy of the opened file
  remove                    remove the uploaded file
  generate                  generate and download the invoice PDF
  back                      return to the dashboard"
            }
        }
    }
}

pub struct HomeScreen {
    pub form: FormView,
    pub attachments: AttachmentsView,
}

enum Screen {
    Home(HomeScreen),
    Login(LoginView),
    Dashboard(DashboardView),
    Invoice(InvoiceView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

impl Reply {
    fn text(s: impl Into<String>) -> Self {
        Reply::Text(s.into())
    }

    fn silent() -> Self {
        Reply::Text(String::new())
    }
}

/// Result of a screen command: what to print and where to go next.
struct Step {
    reply: Reply,
    navigate: Option<ScreenKind>,
}

impl Step {
    fn reply(reply: Reply) -> Self {
        Self {
            reply,
            navigate: None,
        }
    }

    fn go(to: ScreenKind, text: impl Into<String>) -> Self {
        Self {
            reply: Reply::text(text),
            navigate: Some(to),
        }
    }
}

pub struct Shell {
    ctx: ShellContext,
    screen: Screen,
}

impl Shell {
    pub fn new(ctx: ShellContext) -> Self {
        let screen = Self::build(&ctx, ScreenKind::Home);
        Self { ctx, screen }
    }

    pub fn current(&self) -> ScreenKind {
        match self.screen {
            Screen::Home(_) => ScreenKind::Home,
            Screen::Login(_) => ScreenKind::Login,
            Screen::Dashboard(_) => ScreenKind::Dashboard,
            Screen::Invoice(_) => ScreenKind::Invoice,
        }
    }

    pub fn home(&self) -> Option<&HomeScreen> {
        match &self.screen {
            Screen::Home(home) => Some(home),
            _ => None,
        }
    }

    pub fn invoice(&self) -> Option<&InvoiceView> {
        match &self.screen {
            Screen::Invoice(view) => Some(view),
            _ => None,
        }
    }

    /// Banner printed when a screen is entered.
    pub fn banner(&self) -> String {
        let kind = self.current();
        format!("== {} ==  (type 'help' for commands)", kind.title())
    }

    fn build(ctx: &ShellContext, kind: ScreenKind) -> Screen {
        let max_size = ctx.config.max_upload_size_bytes;
        match kind {
            ScreenKind::Home => Screen::Home(HomeScreen {
                form: FormView::new(ctx.service.clone(), ctx.notifications.clone()),
                attachments: AttachmentsView::with_policy(
                    max_size,
                    ctx.notifications.clone(),
                    ctx.viewer.clone(),
                ),
            }),
            ScreenKind::Login => Screen::Login(LoginView::new(ctx.authenticator.clone())),
            ScreenKind::Dashboard => Screen::Dashboard(DashboardView::new(
                ctx.service.clone(),
                ctx.notifications.clone(),
                ctx.config.download_dir.clone(),
            )),
            ScreenKind::Invoice => Screen::Invoice(InvoiceView::with_policy(
                max_size,
                ctx.service.clone(),
                ctx.notifications.clone(),
                ctx.viewer.clone(),
                ctx.config.download_dir.clone(),
            )),
        }
    }

    fn navigate(&mut self, to: ScreenKind) {
        let from = self.current();
        // Assigning drops the old screen.
        self.screen = Self::build(&self.ctx, to);
        tracing::debug!(from = ?from, to = ?to, "Switched screen");
    }

    /// Handle one input line.
    pub async fn handle_line(&mut self, line: &str) -> Reply {
        let line = line.trim();
        if line.is_empty() {
            return Reply::silent();
        }

        let (command, args) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "quit" | "exit" => return Reply::Quit,
            "help" => return Reply::text(self.current().help()),
            _ => {}
        }

        let step = match &mut self.screen {
            Screen::Home(home) => home_command(home, command, args).await,
            Screen::Login(view) => login_command(view, command, args).await,
            Screen::Dashboard(view) => dashboard_command(view, command).await,
            Screen::Invoice(view) => invoice_command(view, command, args).await,
        };

        let step = step.unwrap_or_else(|| {
            Step::reply(Reply::text(format!(
                "Unknown command '{}'. Type 'help' for the commands on this screen.",
                command
            )))
        });

        match step.navigate {
            Some(to) => {
                self.navigate(to);
                match step.reply {
                    Reply::Text(text) if text.is_empty() => Reply::text(self.banner()),
                    Reply::Text(text) => Reply::text(format!("{}\n{}", text, self.banner())),
                    Reply::Quit => Reply::Quit,
                }
            }
            None => step.reply,
        }
    }
}

/// Reply for a failed action: empty when the view already published a
/// notification, the error text otherwise.
fn error_reply(err: &AppError, notified: bool) -> Reply {
    if notified {
        Reply::silent()
    } else {
        Reply::text(err.client_message())
    }
}

fn render_form(form: &FormView) -> String {
    let entry = form.entry();
    let mut out = String::new();
    for field in TimesheetField::ALL {
        let value = entry.get(field);
        let shown = if value.is_empty() { "-".to_string() } else { value };
        out.push_str(&format!(
            "  {:<18}{:<18}{}\n",
            field.label(),
            format!("({})", field.wire_name()),
            shown
        ));
    }
    if form.is_submitting() {
        out.push_str("  Submitting...\n");
    }
    out.trim_end().to_string()
}

fn render_file(position: usize, file: &UploadedFile) -> String {
    let state = match file.state() {
        UploadState::Uploading { progress } => format!("uploading {:>3.0}%", progress),
        UploadState::Complete => "complete".to_string(),
    };
    format!(
        "  {}. {} ({}) {}",
        position,
        truncate_string(&file.name, MAX_NAME_WIDTH),
        format_file_size(file.size),
        state
    )
}

/// Split `attach` arguments on whitespace. Single or double quotes group a
/// path that contains spaces.
fn split_paths(args: &str) -> Result<Vec<String>, Reply> {
    let mut paths = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_token = false;

    for c in args.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_token = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_token {
                    paths.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quote.is_some() {
        return Err(Reply::text("Unterminated quote in path"));
    }
    if in_token {
        paths.push(current);
    }
    Ok(paths)
}

fn parse_position(args: &str) -> Result<usize, Reply> {
    args.parse::<usize>()
        .map_err(|_| Reply::text("Expected a file number, e.g. 'remove 1'"))
}

async fn home_command(home: &mut HomeScreen, command: &str, args: &str) -> Option<Step> {
    let reply = match command {
        "show" => Reply::text(render_form(&home.form)),
        "set" => {
            // `set <field>` with no value clears the field
            let (field, value) = match args.split_once(char::is_whitespace) {
                Some((field, value)) => (field, value.trim()),
                None if !args.is_empty() => (args, ""),
                None => return Some(Step::reply(Reply::text("Usage: set <field> <value>"))),
            };
            match home.form.set_field(field, value) {
                Ok(()) => Reply::text(format!(
                    "Hours Worked: {}",
                    home.form.entry().get(TimesheetField::HoursWorked)
                )),
                Err(e) => Reply::text(e.to_string()),
            }
        }
        "submit" => match home.form.submit().await {
            Ok(()) => Reply::silent(),
            Err(e) => {
                let notified = !matches!(
                    e,
                    AppError::Validation(ValidationError::RequestInFlight)
                );
                error_reply(&e, notified)
            }
        },
        "clear" => {
            home.form.reset();
            Reply::text("Form cleared.")
        }
        "attach" => {
            if args.is_empty() {
                return Some(Step::reply(Reply::text("Usage: attach <path>...")));
            }
            let paths = match split_paths(args) {
                Ok(paths) => paths,
                Err(reply) => return Some(Step::reply(reply)),
            };
            let paths: Vec<&Path> = paths.iter().map(Path::new).collect();
            let results = home.attachments.add_paths(&paths).await;
            let lines: Vec<String> = paths
                .iter()
                .zip(results)
                .filter_map(|(path, result)| match result {
                    Ok(_) => Some(format!("Uploading {}...", path.display())),
                    // rejections are already notified
                    Err(AppError::Validation(_)) => None,
                    Err(e) => Some(format!("{}: {}", path.display(), e.client_message())),
                })
                .collect();
            Reply::text(lines.join("\n"))
        }
        "files" => {
            let files = home.attachments.files();
            if files.is_empty() {
                Reply::text("No attachments.")
            } else {
                let lines: Vec<String> = files
                    .iter()
                    .enumerate()
                    .map(|(i, f)| render_file(i + 1, f))
                    .collect();
                Reply::text(lines.join("\n"))
            }
        }
        "remove" => match parse_position(args) {
            Ok(n) => match home.attachments.remove(n) {
                Ok(file) => Reply::text(format!("Removed {}.", file.name)),
                Err(e) => Reply::text(e.to_string()),
            },
            Err(reply) => reply,
        },
        "view" => match parse_position(args) {
            Ok(n) => match home.attachments.view(n) {
                Ok(path) => Reply::text(format!("Opened {}", path.display())),
                Err(e) => error_reply(&e, false),
            },
            Err(reply) => reply,
        },
        "close" => {
            let count = home.attachments.open_view_count();
            home.attachments.close_views();
            Reply::text(format!("Closed {} open file(s).", count))
        }
        "owner" => return Some(Step::go(ScreenKind::Login, "")),
        _ => return None,
    };
    Some(Step::reply(reply))
}

async fn login_command(view: &mut LoginView, command: &str, args: &str) -> Option<Step> {
    let reply = match command {
        "username" => {
            view.set_username(args);
            Reply::silent()
        }
        "password" => {
            view.set_password(args);
            Reply::silent()
        }
        "login" => {
            return Some(match view.login().await {
                Ok(()) => Step::go(
                    ScreenKind::Dashboard,
                    format!("Signed in as {}.", view.username()),
                ),
                Err(e) => Step::reply(Reply::text(e.to_string())),
            });
        }
        "back" => return Some(Step::go(ScreenKind::Home, "")),
        _ => return None,
    };
    Some(Step::reply(reply))
}

async fn dashboard_command(view: &mut DashboardView, command: &str) -> Option<Step> {
    let reply = match command {
        "download" => match view.download_timesheets().await {
            Ok(path) => Reply::text(format!("Saved to {}", path.display())),
            Err(e) => {
                let notified = !matches!(
                    e,
                    AppError::Validation(ValidationError::RequestInFlight)
                );
                error_reply(&e, notified)
            }
        },
        "invoice" => return Some(Step::go(ScreenKind::Invoice, "")),
        "back" => return Some(Step::go(ScreenKind::Home, "")),
        _ => return None,
    };
    Some(Step::reply(reply))
}

async fn invoice_command(view: &mut InvoiceView, command: &str, args: &str) -> Option<Step> {
    let reply = match command {
        "upload" => {
            if args.is_empty() {
                return Some(Step::reply(Reply::text("Usage: upload <path>")));
            }
            match view.add_path(Path::new(args)).await {
                Ok(_) => Reply::text(format!("Uploading {}...", args)),
                Err(e) => error_reply(&e, matches!(e, AppError::Validation(_))),
            }
        }
        "status" => match view.file() {
            Some(file) => Reply::text(render_file(1, &file)),
            None => Reply::text("No file uploaded."),
        },
        "wait" => match view.file() {
            Some(file) => match view.uploads().wait_until_complete(file.id).await {
                Some(file) => Reply::text(render_file(1, &file)),
                None => Reply::text("No file uploaded."),
            },
            None => Reply::text("No file uploaded."),
        },
        "view" => match view.view() {
            Ok(path) => Reply::text(format!("Opened {}", path.display())),
            Err(e) => error_reply(&e, false),
        },
        "close" => {
            view.close_view();
            Reply::text("Closed the open file.")
        }
        "remove" => match view.remove() {
            Some(file) => Reply::text(format!("Removed {}.", file.name)),
            None => Reply::text("No file uploaded."),
        },
        "generate" => match view.generate().await {
            Ok(path) => Reply::text(format!("Saved to {}", path.display())),
            Err(e) => {
                let notified = !matches!(
                    e,
                    AppError::Validation(ValidationError::RequestInFlight)
                );
                error_reply(&e, notified)
            }
        },
        "back" => return Some(Step::go(ScreenKind::Dashboard, "")),
        _ => return None,
    };
    Some(Step::reply(reply))
}
