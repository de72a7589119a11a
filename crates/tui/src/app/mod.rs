use std::str::FromStr;
use std::time::Duration;

use chrono::Local;
use crossterm::event::{self, Event, KeyEvent};
use rust_decimal::Decimal;

use api_types::{
    service::{ServiceType, ServiceTypeNew, ServiceTypeUpdate},
    transaction::{Transaction, TransactionKind, TransactionNew},
};
use store::{ApiClient, ApiError, Route, ServiceStore, Session, TransactionStore};

use crate::{
    config::AppConfig,
    error::Result,
    ui::{self, keymap::AppAction},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Home,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginMode {
    SignIn,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Name,
    Email,
    Password,
}

#[derive(Debug)]
pub struct LoginState {
    pub mode: LoginMode,
    pub name: String,
    pub email: String,
    pub password: String,
    pub focus: LoginField,
    pub message: Option<String>,
}

#[derive(Debug, Default)]
pub struct PosState {
    pub selected: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpensesMode {
    #[default]
    List,
    Create,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpenseField {
    #[default]
    Description,
    Amount,
}

#[derive(Debug, Default)]
pub struct ExpensesState {
    pub mode: ExpensesMode,
    pub selected: usize,
    pub description: String,
    pub amount: String,
    pub focus: ExpenseField,
}

#[derive(Debug, Default)]
pub struct HistoryState {
    pub selected: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsMode {
    #[default]
    List,
    Create,
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServiceField {
    #[default]
    Name,
    Price,
}

#[derive(Debug, Default)]
pub struct SettingsState {
    pub mode: SettingsMode,
    pub selected: usize,
    pub name: String,
    pub price: String,
    pub focus: ServiceField,
    pub editing_id: Option<String>,
}

#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    /// Active section when the screen is `Home`; `Login` otherwise.
    pub route: Route,
    pub login: LoginState,
    pub pos: PosState,
    pub expenses: ExpensesState,
    pub history: HistoryState,
    pub settings: SettingsState,
    pub status: Option<String>,
}

pub struct App {
    pub state: AppState,
    session: Session,
    transactions: TransactionStore,
    services: ServiceStore,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let api = ApiClient::new(&config.base_url)?;
        let session = Session::new(api.clone());
        let transactions = TransactionStore::new(api.clone());
        let services = ServiceStore::new(api);

        let state = AppState {
            screen: Screen::Login,
            route: Route::Login,
            login: LoginState {
                mode: LoginMode::SignIn,
                name: String::new(),
                email: config.email,
                password: String::new(),
                focus: LoginField::Email,
                message: None,
            },
            pos: PosState::default(),
            expenses: ExpensesState::default(),
            history: HistoryState::default(),
            settings: SettingsState::default(),
            status: None,
        };

        Ok(Self {
            state,
            session,
            transactions,
            services,
            should_quit: false,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn transactions(&self) -> &[Transaction] {
        self.transactions.items()
    }

    pub fn services(&self) -> &[ServiceType] {
        self.services.items()
    }

    /// Rows of the expenses screen, in mirror order.
    pub fn expense_rows(&self) -> Vec<&Transaction> {
        self.transactions
            .items()
            .iter()
            .filter(|tx| tx.kind == TransactionKind::Expense)
            .collect()
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        // First guarded entry: probes the provider and lands on either the
        // login screen or the dashboard.
        self.enter(Route::Dashboard).await;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);

        while !self.should_quit {
            terminal.draw(|frame| ui::render(frame, &*self))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key).await?,
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
        }

        Ok(())
    }

    async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        match ui::keymap::map_key(key) {
            AppAction::Quit => self.should_quit = true,
            AppAction::Cancel => self.cancel(),
            AppAction::NextField => self.advance_focus(),
            AppAction::Submit => self.submit().await,
            AppAction::Backspace => self.backspace(),
            AppAction::Up => self.move_selection(-1),
            AppAction::Down => self.move_selection(1),
            AppAction::ToggleMode => self.toggle_login_mode(),
            AppAction::Input(ch) => self.input(ch).await,
            AppAction::None => {}
        }
        Ok(())
    }

    /// Every section switch goes through the guard; the decision may land
    /// somewhere other than the requested destination.
    async fn enter(&mut self, destination: Route) {
        let decision = store::navigate(&mut self.session, destination).await;
        match decision.target(destination) {
            Route::Login => {
                self.state.screen = Screen::Login;
                self.state.route = Route::Login;
            }
            target => {
                self.state.screen = Screen::Home;
                self.state.route = target;
                self.load_route_data(target).await;
            }
        }
    }

    /// Reads absorb failures: the mirror keeps its previous (possibly stale)
    /// sequence and the status line says why.
    async fn load_route_data(&mut self, route: Route) {
        let fresh = match route {
            Route::Dashboard | Route::Expenses | Route::History => {
                self.transactions.fetch_all().await
            }
            Route::Pos | Route::Settings => self.services.fetch_all().await,
            Route::Login => Ok(()),
        };
        if let Err(err) = fresh {
            self.state.status = Some(message_for_error(&err));
        }
        self.clamp_selections();
    }

    async fn refresh_current(&mut self) {
        self.state.status = None;
        self.load_route_data(self.state.route).await;
    }

    fn is_editing(&self) -> bool {
        match self.state.screen {
            Screen::Login => true,
            Screen::Home => match self.state.route {
                Route::Expenses => self.state.expenses.mode == ExpensesMode::Create,
                Route::Settings => self.state.settings.mode != SettingsMode::List,
                _ => false,
            },
        }
    }

    fn cancel(&mut self) {
        self.state.status = None;
        match self.state.screen {
            Screen::Login => self.state.login.message = None,
            Screen::Home => match self.state.route {
                Route::Expenses => {
                    let form = &mut self.state.expenses;
                    form.mode = ExpensesMode::List;
                    form.description.clear();
                    form.amount.clear();
                }
                Route::Settings => {
                    let form = &mut self.state.settings;
                    form.mode = SettingsMode::List;
                    form.name.clear();
                    form.price.clear();
                    form.editing_id = None;
                }
                _ => {}
            },
        }
    }

    fn advance_focus(&mut self) {
        match self.state.screen {
            Screen::Login => {
                let login = &mut self.state.login;
                login.focus = match (login.mode, login.focus) {
                    (LoginMode::SignIn, LoginField::Email) => LoginField::Password,
                    (LoginMode::SignIn, _) => LoginField::Email,
                    (LoginMode::Register, LoginField::Name) => LoginField::Email,
                    (LoginMode::Register, LoginField::Email) => LoginField::Password,
                    (LoginMode::Register, LoginField::Password) => LoginField::Name,
                };
            }
            Screen::Home => match self.state.route {
                Route::Expenses if self.state.expenses.mode == ExpensesMode::Create => {
                    let form = &mut self.state.expenses;
                    form.focus = match form.focus {
                        ExpenseField::Description => ExpenseField::Amount,
                        ExpenseField::Amount => ExpenseField::Description,
                    };
                }
                Route::Settings if self.state.settings.mode != SettingsMode::List => {
                    let form = &mut self.state.settings;
                    form.focus = match form.focus {
                        ServiceField::Name => ServiceField::Price,
                        ServiceField::Price => ServiceField::Name,
                    };
                }
                _ => {}
            },
        }
    }

    fn active_field_mut(&mut self) -> Option<&mut String> {
        match self.state.screen {
            Screen::Login => {
                let login = &mut self.state.login;
                Some(match login.focus {
                    LoginField::Name => &mut login.name,
                    LoginField::Email => &mut login.email,
                    LoginField::Password => &mut login.password,
                })
            }
            Screen::Home => match self.state.route {
                Route::Expenses if self.state.expenses.mode == ExpensesMode::Create => {
                    let form = &mut self.state.expenses;
                    Some(match form.focus {
                        ExpenseField::Description => &mut form.description,
                        ExpenseField::Amount => &mut form.amount,
                    })
                }
                Route::Settings if self.state.settings.mode != SettingsMode::List => {
                    let form = &mut self.state.settings;
                    Some(match form.focus {
                        ServiceField::Name => &mut form.name,
                        ServiceField::Price => &mut form.price,
                    })
                }
                _ => None,
            },
        }
    }

    fn backspace(&mut self) {
        if let Some(field) = self.active_field_mut() {
            field.pop();
        }
    }

    fn move_selection(&mut self, delta: i64) {
        if self.state.screen != Screen::Home {
            return;
        }
        let len = match self.state.route {
            Route::Pos | Route::Settings => self.services.len(),
            Route::History => self.transactions.len(),
            Route::Expenses => self.expense_rows().len(),
            _ => 0,
        };
        if len == 0 {
            return;
        }
        let selected = match self.state.route {
            Route::Pos => &mut self.state.pos.selected,
            Route::History => &mut self.state.history.selected,
            Route::Expenses => &mut self.state.expenses.selected,
            Route::Settings => &mut self.state.settings.selected,
            _ => return,
        };
        *selected = (*selected as i64 + delta).clamp(0, len as i64 - 1) as usize;
    }

    fn clamp_selections(&mut self) {
        let tx_len = self.transactions.len();
        let service_len = self.services.len();
        let expense_len = self.expense_rows().len();
        self.state.history.selected = self.state.history.selected.min(tx_len.saturating_sub(1));
        self.state.pos.selected = self.state.pos.selected.min(service_len.saturating_sub(1));
        self.state.settings.selected =
            self.state.settings.selected.min(service_len.saturating_sub(1));
        self.state.expenses.selected =
            self.state.expenses.selected.min(expense_len.saturating_sub(1));
    }

    async fn submit(&mut self) {
        match self.state.screen {
            Screen::Login => match self.state.login.mode {
                LoginMode::SignIn => self.attempt_login().await,
                LoginMode::Register => self.attempt_register().await,
            },
            Screen::Home => match self.state.route {
                Route::Pos => self.sell_selected().await,
                Route::Expenses if self.state.expenses.mode == ExpensesMode::Create => {
                    self.submit_expense().await;
                }
                Route::Settings if self.state.settings.mode != SettingsMode::List => {
                    self.submit_service().await;
                }
                _ => {}
            },
        }
    }

    async fn input(&mut self, ch: char) {
        if self.is_editing() {
            if let Some(field) = self.active_field_mut() {
                field.push(ch);
            }
            return;
        }
        self.section_key(ch).await;
    }

    async fn section_key(&mut self, ch: char) {
        match ch {
            'q' | 'Q' => self.should_quit = true,
            'd' | 'D' => self.enter(Route::Dashboard).await,
            'p' | 'P' => self.enter(Route::Pos).await,
            'e' | 'E' => self.enter(Route::Expenses).await,
            'h' | 'H' => self.enter(Route::History).await,
            's' | 'S' => self.enter(Route::Settings).await,
            'r' | 'R' => self.refresh_current().await,
            'a' | 'A' => self.open_create_form(),
            'm' | 'M' => self.open_edit_form(),
            'x' | 'X' => self.delete_selected().await,
            'o' | 'O' => {
                if self.state.route == Route::Settings {
                    self.logout().await;
                }
            }
            _ => {}
        }
    }

    fn toggle_login_mode(&mut self) {
        if self.state.screen != Screen::Login {
            return;
        }
        let login = &mut self.state.login;
        login.mode = match login.mode {
            LoginMode::SignIn => LoginMode::Register,
            LoginMode::Register => LoginMode::SignIn,
        };
        login.focus = match login.mode {
            LoginMode::SignIn => LoginField::Email,
            LoginMode::Register => LoginField::Name,
        };
        login.message = None;
    }

    async fn attempt_login(&mut self) {
        let email = self.state.login.email.trim().to_string();
        let password = self.state.login.password.clone();
        if email.is_empty() || password.is_empty() {
            self.state.login.message = Some("Compila tutti i campi.".to_string());
            return;
        }

        if self.session.login(&email, &password).await {
            self.state.login.password.clear();
            self.state.login.message = None;
            self.enter(Route::Dashboard).await;
        } else {
            self.state.login.message = Some("Credenziali errate.".to_string());
        }
    }

    async fn attempt_register(&mut self) {
        let name = self.state.login.name.trim().to_string();
        let email = self.state.login.email.trim().to_string();
        let password = self.state.login.password.clone();
        if name.is_empty() || email.is_empty() || password.is_empty() {
            self.state.login.message = Some("Compila tutti i campi.".to_string());
            return;
        }

        if self.session.register(&name, &email, &password).await {
            self.state.login.password.clear();
            self.state.login.message = None;
            self.enter(Route::Dashboard).await;
        } else {
            self.state.login.message = Some("Registrazione non riuscita.".to_string());
        }
    }

    async fn logout(&mut self) {
        self.session.logout().await;
        self.state.status = None;
        self.enter(Route::Login).await;
    }

    /// Rings up the selected service as an income transaction at its preset
    /// price.
    async fn sell_selected(&mut self) {
        let Some(service) = self
            .services
            .items()
            .get(self.state.pos.selected)
            .cloned()
        else {
            return;
        };

        let new = TransactionNew {
            date: Local::now().fixed_offset(),
            kind: TransactionKind::Income,
            amount: service.default_price,
            description: service.name.clone(),
            service_id: Some(service.id.clone()),
        };
        match self.transactions.add(&new).await {
            Ok(()) => {
                self.state.status = Some(format!(
                    "Vendita registrata: {} ({:.2} €)",
                    service.name, service.default_price
                ));
            }
            Err(err) => self.state.status = Some(message_for_error(&err)),
        }
    }

    async fn submit_expense(&mut self) {
        let description = self.state.expenses.description.trim().to_string();
        if description.is_empty() {
            self.state.status = Some("Aggiungi una descrizione.".to_string());
            return;
        }
        let Some(amount) = parse_amount(&self.state.expenses.amount) else {
            self.state.status = Some("Importo non valido.".to_string());
            return;
        };

        let new = TransactionNew {
            date: Local::now().fixed_offset(),
            kind: TransactionKind::Expense,
            amount,
            description,
            service_id: None,
        };
        match self.transactions.add(&new).await {
            Ok(()) => {
                let form = &mut self.state.expenses;
                form.mode = ExpensesMode::List;
                form.description.clear();
                form.amount.clear();
                self.state.status = Some("Spesa registrata.".to_string());
            }
            Err(err) => self.state.status = Some(message_for_error(&err)),
        }
    }

    async fn submit_service(&mut self) {
        let name = self.state.settings.name.trim().to_string();
        if name.is_empty() {
            self.state.status = Some("Aggiungi un nome.".to_string());
            return;
        }
        let Some(price) = parse_amount(&self.state.settings.price) else {
            self.state.status = Some("Prezzo non valido.".to_string());
            return;
        };

        let result = match self.state.settings.editing_id.clone() {
            Some(id) => {
                let patch = ServiceTypeUpdate {
                    name: Some(name),
                    default_price: Some(price),
                };
                self.services.update(&id, &patch).await
            }
            None => {
                let new = ServiceTypeNew {
                    name,
                    default_price: price,
                };
                self.services.add(&new).await
            }
        };
        match result {
            Ok(()) => {
                let form = &mut self.state.settings;
                form.mode = SettingsMode::List;
                form.name.clear();
                form.price.clear();
                form.editing_id = None;
                self.state.status = Some("Servizio salvato.".to_string());
            }
            Err(err) => self.state.status = Some(message_for_error(&err)),
        }
    }

    fn open_create_form(&mut self) {
        match self.state.route {
            Route::Expenses => {
                let form = &mut self.state.expenses;
                form.mode = ExpensesMode::Create;
                form.description.clear();
                form.amount.clear();
                form.focus = ExpenseField::Description;
            }
            Route::Settings => {
                let form = &mut self.state.settings;
                form.mode = SettingsMode::Create;
                form.name.clear();
                form.price.clear();
                form.editing_id = None;
                form.focus = ServiceField::Name;
            }
            _ => {}
        }
    }

    fn open_edit_form(&mut self) {
        if self.state.route != Route::Settings {
            return;
        }
        let Some(service) = self
            .services
            .items()
            .get(self.state.settings.selected)
            .cloned()
        else {
            return;
        };
        let form = &mut self.state.settings;
        form.mode = SettingsMode::Edit;
        form.name = service.name;
        form.price = format!("{:.2}", service.default_price);
        form.editing_id = Some(service.id);
        form.focus = ServiceField::Name;
    }

    async fn delete_selected(&mut self) {
        match self.state.route {
            Route::History => {
                let Some(id) = self
                    .transactions
                    .items()
                    .get(self.state.history.selected)
                    .map(|tx| tx.id.clone())
                else {
                    return;
                };
                // Transaction deletes absorb failures: the row survives until
                // the next refresh if the server disagreed.
                let _ = self.transactions.delete(&id).await;
                self.state.status = Some("Movimento eliminato.".to_string());
            }
            Route::Expenses if self.state.expenses.mode == ExpensesMode::List => {
                let Some(id) = self
                    .expense_rows()
                    .get(self.state.expenses.selected)
                    .map(|tx| tx.id.clone())
                else {
                    return;
                };
                let _ = self.transactions.delete(&id).await;
                self.state.status = Some("Spesa eliminata.".to_string());
            }
            Route::Settings if self.state.settings.mode == SettingsMode::List => {
                let Some(id) = self
                    .services
                    .items()
                    .get(self.state.settings.selected)
                    .map(|service| service.id.clone())
                else {
                    return;
                };
                // Service deletes propagate; the user has to see a removal
                // that did not take.
                match self.services.delete(&id).await {
                    Ok(()) => self.state.status = Some("Servizio eliminato.".to_string()),
                    Err(err) => self.state.status = Some(message_for_error(&err)),
                }
            }
            _ => {}
        }
        self.clamp_selections();
    }
}

/// Accepts `.` or `,` as the decimal separator; negatives are rejected.
fn parse_amount(input: &str) -> Option<Decimal> {
    let normalized = input.trim().replace(',', ".");
    let amount = Decimal::from_str(&normalized).ok()?;
    (amount >= Decimal::ZERO).then_some(amount)
}

fn message_for_error(err: &ApiError) -> String {
    match err {
        ApiError::Network(err) => format!("Server non raggiungibile: {err}"),
        ApiError::Server { status, message } => match status.as_u16() {
            401 | 403 => "Sessione scaduta, accedi di nuovo.".to_string(),
            _ => format!("Errore server: {message}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::parse_amount;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_amount_accepts_both_decimal_separators() {
        assert_eq!(parse_amount("12.50"), Some(dec!(12.50)));
        assert_eq!(parse_amount("12,50"), Some(dec!(12.50)));
        assert_eq!(parse_amount(" 7 "), Some(dec!(7)));
    }

    #[test]
    fn parse_amount_rejects_negative_and_garbage() {
        assert_eq!(parse_amount("-1"), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
    }
}
