use std::time::{Duration, Instant};

use api_types::transaction::TransactionType;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use engine::{
    AccountField, AccountsOutcome, AccountsRequest, Controller, DataOutcome, DataRequest,
    EngineError, FilterField, FollowUp, FormField, Mutation, MutationOutcome, Notice, NoticeLevel,
};
use tokio::sync::mpsc;

use crate::{
    client::Client,
    config::AppConfig,
    error::{AppError, Result},
    ui::{
        self,
        keymap::{AppAction, map_key},
    },
};

const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Transactions,
    Add,
    Filters,
    Accounts,
    Categories,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Self::Transactions,
        Self::Add,
        Self::Filters,
        Self::Accounts,
        Self::Categories,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Transactions => "Transactions",
            Self::Add => "Add",
            Self::Filters => "Filters",
            Self::Accounts => "Accounts",
            Self::Categories => "Categories",
        }
    }

    /// Sections where letters are typed into a field.
    pub fn takes_text(self) -> bool {
        matches!(self, Self::Add | Self::Filters | Self::Accounts)
    }

    fn from_digit(ch: char) -> Option<Self> {
        let index = ch.to_digit(10)?.checked_sub(1)?;
        Self::ALL.get(index as usize).copied()
    }
}

#[derive(Debug, Clone)]
pub struct ToastState {
    pub message: String,
    pub level: NoticeLevel,
    expires_at: Instant,
}

impl ToastState {
    fn from_notice(notice: Notice, now: Instant) -> Self {
        Self {
            message: notice.message,
            level: notice.level,
            expires_at: now + TOAST_TTL,
        }
    }
}

/// Prefix the user typed before cycling through account names, and the
/// suggestion currently shown.
#[derive(Debug, Clone)]
struct AccountCompletion {
    prefix: String,
    index: usize,
}

#[derive(Debug)]
pub struct AppState {
    pub controller: Controller,
    pub section: Section,
    pub selected: usize,
    pub form_focus: FormField,
    pub filter_focus: FilterField,
    pub account_focus: AccountField,
    completion: Option<AccountCompletion>,
    pub toast: Option<ToastState>,
    pub base_url: String,
}

impl AppState {
    fn new(base_url: String) -> Self {
        Self {
            controller: Controller::new(),
            section: Section::Transactions,
            selected: 0,
            form_focus: FormField::Date,
            filter_focus: FilterField::StartDate,
            account_focus: AccountField::Name,
            completion: None,
            toast: None,
            base_url,
        }
    }

    fn surface_notice(&mut self) {
        if let Some(notice) = self.controller.take_notice() {
            self.toast = Some(ToastState::from_notice(notice, Instant::now()));
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.controller.state().transactions.len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    fn select_next(&mut self) {
        let len = self.controller.state().transactions.len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn selected_transaction_id(&self) -> Option<i64> {
        self.controller
            .state()
            .transactions
            .get(self.selected)
            .map(|tx| tx.id)
    }

    fn cycle_account_suggestion(&mut self, forward: bool) {
        let prefix = match &self.completion {
            Some(completion) => completion.prefix.clone(),
            None => self.controller.state().form.account.clone(),
        };
        let suggestions: Vec<String> = self
            .controller
            .state()
            .account_suggestions(&prefix)
            .into_iter()
            .map(str::to_string)
            .collect();
        if suggestions.is_empty() {
            return;
        }
        let index = match &self.completion {
            Some(completion) => step_index(completion.index, suggestions.len(), forward),
            None if forward => 0,
            None => suggestions.len() - 1,
        };
        if let Some(name) = suggestions.get(index) {
            self.controller.form_mut().account = name.clone();
            self.completion = Some(AccountCompletion { prefix, index });
        }
    }

    fn cycle_filter_select(&mut self, field: FilterField) {
        let options: Vec<String> = match field {
            FilterField::Account => std::iter::once(String::new())
                .chain(
                    self.controller
                        .state()
                        .accounts
                        .iter()
                        .map(|account| account.name.clone()),
                )
                .collect(),
            FilterField::Type => vec![
                String::new(),
                TransactionType::Income.as_str().to_string(),
                TransactionType::Expense.as_str().to_string(),
            ],
            _ => return,
        };
        let current = self.controller.state().filters.get(field);
        let next = options
            .iter()
            .position(|option| option == current)
            .map_or(0, |index| step_index(index, options.len(), true));
        if let Some(value) = options.get(next) {
            self.controller.update_filter(field, value.clone());
        }
    }
}

fn step_index(index: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (index + 1) % len
    } else {
        (index + len - 1) % len
    }
}

fn step<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
    let index = all.iter().position(|item| *item == current).unwrap_or(0);
    all.get(step_index(index, all.len(), forward))
        .copied()
        .unwrap_or(current)
}

/// Filter fields that pick from a list instead of taking free text.
pub fn is_select(field: FilterField) -> bool {
    matches!(field, FilterField::Account | FilterField::Type)
}

#[derive(Debug)]
enum Message {
    Data(DataOutcome),
    Accounts(AccountsOutcome),
    Mutation(MutationOutcome),
}

pub struct App {
    client: Client,
    pub state: AppState,
    tx: mpsc::UnboundedSender<Message>,
    rx: mpsc::UnboundedReceiver<Message>,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = Client::new(&config.base_url)?;
        let (tx, rx) = mpsc::unbounded_channel();
        Ok(Self {
            state: AppState::new(client.base_url().to_string()),
            client,
            tx,
            rx,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        let startup = FollowUp {
            data: Some(self.state.controller.begin_load_data()),
            accounts: Some(self.state.controller.begin_load_accounts()),
        };
        self.spawn_follow_up(startup);

        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(100);

        while !self.should_quit {
            self.drain_messages();
            if self
                .state
                .toast
                .as_ref()
                .is_some_and(|toast| toast.expires_at <= Instant::now())
            {
                self.state.toast = None;
            }

            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    _ => {}
                }
            }
            tokio::task::yield_now().await;
        }

        tracing::info!("quitting");
        Ok(())
    }

    fn drain_messages(&mut self) {
        while let Ok(message) = self.rx.try_recv() {
            let controller = &mut self.state.controller;
            let follow_up: std::result::Result<FollowUp, EngineError> = match message {
                Message::Data(outcome) => controller.apply_data(outcome).map(|()| FollowUp::default()),
                Message::Accounts(outcome) => {
                    controller.apply_accounts(outcome).map(|()| FollowUp::default())
                }
                Message::Mutation(outcome) => controller.finish_mutation(outcome),
            };
            // Failures already sit on the notice.
            if let Ok(follow_up) = follow_up {
                self.spawn_follow_up(follow_up);
            }
            self.state.surface_notice();
            self.state.clamp_selection();
        }
    }

    fn spawn_data(&self, request: DataRequest) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = request.execute(&client).await;
            // The receiver is gone only once the app is shutting down.
            let _ = tx.send(Message::Data(outcome));
        });
    }

    fn spawn_accounts(&self, request: AccountsRequest) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = request.execute(&client).await;
            let _ = tx.send(Message::Accounts(outcome));
        });
    }

    fn spawn_mutation(&self, mutation: Mutation) {
        tracing::debug!(?mutation, "sending mutation");
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = mutation.execute(&client).await;
            let _ = tx.send(Message::Mutation(outcome));
        });
    }

    fn spawn_follow_up(&self, follow_up: FollowUp) {
        let FollowUp { data, accounts } = follow_up;
        if let Some(request) = data {
            self.spawn_data(request);
        }
        if let Some(request) = accounts {
            self.spawn_accounts(request);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let action = map_key(key);
        match action {
            AppAction::Quit => {
                self.should_quit = true;
                return;
            }
            AppAction::Cancel => {
                self.state.toast = None;
                return;
            }
            AppAction::PrevSection => {
                self.state.section = step(&Section::ALL, self.state.section, false);
                return;
            }
            AppAction::NextSection => {
                self.state.section = step(&Section::ALL, self.state.section, true);
                return;
            }
            AppAction::Input(ch) if !self.state.section.takes_text() => {
                if self.handle_global_char(ch) {
                    return;
                }
            }
            _ => {}
        }

        match self.state.section {
            Section::Transactions => self.handle_transactions_key(action),
            Section::Add => self.handle_add_key(action),
            Section::Filters => self.handle_filters_key(action),
            Section::Accounts => self.handle_accounts_key(action),
            Section::Categories => {}
        }
    }

    /// Shortcuts of the read-only sections. Returns `true` when consumed.
    fn handle_global_char(&mut self, ch: char) -> bool {
        match ch {
            'q' | 'Q' => self.should_quit = true,
            'r' | 'R' => {
                let request = self.state.controller.begin_load_data();
                self.spawn_data(request);
            }
            other => match Section::from_digit(other) {
                Some(section) => self.state.section = section,
                None => return false,
            },
        }
        true
    }

    fn handle_transactions_key(&mut self, action: AppAction) {
        match action {
            AppAction::Up => self.state.select_prev(),
            AppAction::Down => self.state.select_next(),
            AppAction::Delete | AppAction::Input('d' | 'D') => {
                if let Some(id) = self.state.selected_transaction_id() {
                    let mutation = self.state.controller.begin_delete_transaction(id);
                    self.spawn_mutation(mutation);
                }
            }
            _ => {}
        }
    }

    fn handle_add_key(&mut self, action: AppAction) {
        let focus = self.state.form_focus;
        match action {
            AppAction::NextField | AppAction::PrevField => {
                let forward = action == AppAction::NextField;
                self.state.form_focus = step(&FormField::ALL, focus, forward);
                self.state.completion = None;
            }
            AppAction::Up | AppAction::Down if focus == FormField::Account => {
                self.state
                    .cycle_account_suggestion(action == AppAction::Down);
            }
            AppAction::Input(' ') if focus == FormField::Type => {
                let form = self.state.controller.form_mut();
                form.kind = form.kind.toggled();
            }
            AppAction::Input(ch) => {
                if let Some(text) = self.state.controller.form_mut().text_mut(focus) {
                    text.push(ch);
                }
                self.state.completion = None;
            }
            AppAction::Backspace => {
                if let Some(text) = self.state.controller.form_mut().text_mut(focus) {
                    text.pop();
                }
                self.state.completion = None;
            }
            AppAction::Submit => {
                if let Ok(mutation) = self.state.controller.begin_submit_transaction() {
                    self.spawn_mutation(mutation);
                }
                self.state.surface_notice();
            }
            _ => {}
        }
    }

    fn handle_filters_key(&mut self, action: AppAction) {
        let focus = self.state.filter_focus;
        match action {
            AppAction::NextField | AppAction::Down => {
                self.state.filter_focus = step(&FilterField::ALL, focus, true);
            }
            AppAction::PrevField | AppAction::Up => {
                self.state.filter_focus = step(&FilterField::ALL, focus, false);
            }
            AppAction::Input(' ') if is_select(focus) => self.state.cycle_filter_select(focus),
            AppAction::Input(ch) if !is_select(focus) => {
                self.state.controller.filters_mut().field_mut(focus).push(ch);
            }
            AppAction::Backspace if is_select(focus) => {
                self.state.controller.update_filter(focus, "");
            }
            AppAction::Backspace => {
                self.state.controller.filters_mut().field_mut(focus).pop();
            }
            AppAction::Submit => {
                let request = self.state.controller.begin_apply_filters();
                self.spawn_data(request);
            }
            _ => {}
        }
    }

    fn handle_accounts_key(&mut self, action: AppAction) {
        let focus = self.state.account_focus;
        match action {
            AppAction::NextField | AppAction::PrevField | AppAction::Up | AppAction::Down => {
                self.state.account_focus = match focus {
                    AccountField::Name => AccountField::Description,
                    AccountField::Description => AccountField::Name,
                };
            }
            AppAction::Input(ch) => self
                .state
                .controller
                .account_form_mut()
                .field_mut(focus)
                .push(ch),
            AppAction::Backspace => {
                self.state
                    .controller
                    .account_form_mut()
                    .field_mut(focus)
                    .pop();
            }
            AppAction::Submit => {
                if let Some(mutation) = self.state.controller.begin_submit_account() {
                    self.spawn_mutation(mutation);
                }
            }
            _ => {}
        }
    }
}
