//! MobiComm Recharge Terminal Client
//!
//! Interactive front-end driving the purchase flow: verify a number,
//! browse the plan catalog, pay, and collect the receipt.

mod ui;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mobicomm_backend::{BackendConfig, HttpBackend};
use mobicomm_core::{CheckoutState, RechargeBackend};
use mobicomm_flow::{
    Catalog, CatalogScreen, GateOutcome, IdentityGate, PaymentMethod, PaymentOutcome,
    PaymentScreen, PlanFilter, ReceiptScreen, Screen, Transition,
};
use mobicomm_payments::PaymentReceipt;

use crate::ui::Ui;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let config = BackendConfig::from_env();
    tracing::info!(base_url = %config.base_url, "MobiComm recharge client starting");

    let backend: Arc<dyn RechargeBackend> = Arc::new(HttpBackend::new(config)?);

    println!("══════════════════════════════════════════════════");
    println!("  MobiComm Recharge");
    println!("══════════════════════════════════════════════════");

    run(backend).await
}

/// Drive the screen state machine until the user quits
async fn run(backend: Arc<dyn RechargeBackend>) -> anyhow::Result<()> {
    let state = CheckoutState::new();
    let gate = IdentityGate::new(backend.clone());
    let catalog_screen = CatalogScreen::new(backend.clone());
    let payment_screen = PaymentScreen::new(backend);

    let mut ui = Ui::new();
    let mut catalog = Catalog::empty();
    let mut last_receipt: Option<PaymentReceipt> = None;
    let mut screen = Screen::IdentityGate;

    loop {
        let next = match screen {
            Screen::IdentityGate => identity_screen(&mut ui, &gate, &state).await?,
            Screen::Catalog => {
                catalog_loop(&mut ui, &catalog_screen, &state, &mut catalog).await?
            }
            Screen::Payment => {
                payment_loop(&mut ui, &payment_screen, &state, &mut last_receipt).await?
            }
            Screen::Receipt => {
                receipt_loop(&mut ui, &payment_screen, &state, last_receipt.take()).await?
            }
        };

        match next {
            Some(next) => screen = next,
            None => break,
        }
    }

    println!("Goodbye!");
    Ok(())
}

async fn identity_screen(
    ui: &mut Ui,
    gate: &IdentityGate,
    state: &CheckoutState,
) -> anyhow::Result<Option<Screen>> {
    ui.heading(Screen::IdentityGate.title());

    let prefill = IdentityGate::stored_number(state);
    if let Some(number) = &prefill {
        ui.line(&format!("Last used number: {number} (enter to reuse)"));
    }

    loop {
        let Some(input) = ui.prompt("Mobile number (or 'quit')").await? else {
            return Ok(None);
        };
        if input == "quit" {
            return Ok(None);
        }
        let input = if input.is_empty() {
            prefill.clone().unwrap_or_default()
        } else {
            input
        };

        ui.busy("Validating...");
        match gate.submit(state, &input).await {
            GateOutcome::Accepted => {
                ui.line("Number verified.");
                return Ok(Some(Screen::Catalog));
            }
            GateOutcome::Rejected { message } | GateOutcome::Unavailable { message } => {
                ui.error(&message);
            }
        }
    }
}

async fn catalog_loop(
    ui: &mut Ui,
    screen: &CatalogScreen,
    state: &CheckoutState,
    catalog: &mut Catalog,
) -> anyhow::Result<Option<Screen>> {
    ui.heading(Screen::Catalog.title());
    load_catalog(ui, screen, catalog).await;
    ui.render_catalog(catalog.panes());

    let mut filter = PlanFilter::default();
    loop {
        let Some(input) = ui
            .prompt(
                "catalog> (select <id> | search <text> | data <val> | validity <val> | number <mobile> | reload | quit)",
            )
            .await?
        else {
            return Ok(None);
        };
        let (command, rest) = input.split_once(' ').unwrap_or((input.as_str(), ""));
        let rest = rest.trim();

        match command {
            "quit" => return Ok(None),
            "reload" => {
                load_catalog(ui, screen, catalog).await;
                ui.render_catalog(catalog.panes());
            }
            "search" => {
                filter.query = rest.to_string();
                if filter.is_active() {
                    ui.render_results(&filter.apply(catalog.panes()));
                } else {
                    ui.render_catalog(catalog.panes());
                }
            }
            "data" => {
                filter.data = (!rest.is_empty()).then(|| rest.to_string());
                ui.render_results(&filter.apply(catalog.panes()));
            }
            "validity" => {
                filter.validity = (!rest.is_empty()).then(|| rest.to_string());
                ui.render_results(&filter.apply(catalog.panes()));
            }
            "number" => match screen.update_number(state, rest) {
                Ok(()) => ui.line("Mobile number updated successfully!"),
                Err(err) => ui.error(&err.user_message()),
            },
            "select" => {
                let Ok(plan_id) = rest.parse::<i64>() else {
                    ui.error("Usage: select <plan id>");
                    continue;
                };
                let Some((category, plan)) =
                    catalog.find_plan(plan_id).map(|(c, p)| (c.clone(), p.clone()))
                else {
                    ui.error("No such plan. Pick an id from the list above.");
                    continue;
                };
                let mobile = IdentityGate::stored_number(state).unwrap_or_default();
                match screen.select_plan(state, &mobile, &category, &plan) {
                    Ok(Transition::Forward(next)) => return Ok(Some(next)),
                    Ok(_) => {}
                    Err(err) => ui.error(&err.user_message()),
                }
            }
            "" => {}
            _ => ui.error("Unknown command."),
        }
    }
}

async fn load_catalog(ui: &Ui, screen: &CatalogScreen, catalog: &mut Catalog) {
    let epoch = catalog.begin_refresh();
    ui.busy("Loading plans...");
    match screen.load().await {
        Ok(panes) => {
            catalog.apply(epoch, panes);
        }
        Err(err) => ui.error(&err.user_message()),
    }
}

async fn payment_loop(
    ui: &mut Ui,
    screen: &PaymentScreen,
    state: &CheckoutState,
    last_receipt: &mut Option<PaymentReceipt>,
) -> anyhow::Result<Option<Screen>> {
    ui.heading(Screen::Payment.title());

    let summary = match screen.order_summary(state) {
        Ok(summary) => summary,
        Err(err) => {
            ui.error(&err.user_message());
            return Ok(Some(Screen::redirect_for(&err).unwrap_or(Screen::IdentityGate)));
        }
    };
    ui.render_summary(&summary);

    loop {
        let Some(input) = ui
            .prompt("pay> (card | upi [app] | netbanking [bank] | back | quit)")
            .await?
        else {
            return Ok(None);
        };
        let (command, rest) = input.split_once(' ').unwrap_or((input.as_str(), ""));
        let rest = rest.trim();
        let detail = (!rest.is_empty()).then(|| rest.to_string());

        let method = match command {
            "quit" => return Ok(None),
            "back" => return Ok(Some(Screen::Catalog)),
            "card" => PaymentMethod::Card,
            "upi" => PaymentMethod::Upi { app: detail },
            "netbanking" => PaymentMethod::NetBanking { bank: detail },
            _ => {
                ui.error("Choose a payment method: card, upi or netbanking.");
                continue;
            }
        };

        ui.busy(&format!("Processing payment of ₹{}...", summary.total));
        match screen.pay(state, &method).await {
            PaymentOutcome::Success(receipt) => {
                *last_receipt = Some(*receipt);
                return Ok(Some(Screen::Receipt));
            }
            PaymentOutcome::Blocked { redirect, message } => {
                ui.error(&message);
                return Ok(Some(redirect));
            }
            PaymentOutcome::Failed { message } => ui.error(&message),
        }
    }
}

async fn receipt_loop(
    ui: &mut Ui,
    payment_screen: &PaymentScreen,
    state: &CheckoutState,
    receipt: Option<PaymentReceipt>,
) -> anyhow::Result<Option<Screen>> {
    ui.heading(Screen::Receipt.title());

    match ReceiptScreen::view(state) {
        Ok(view) => ui.render_receipt(&view),
        Err(err) => {
            ui.error(&err.user_message());
            return Ok(Some(Screen::redirect_for(&err).unwrap_or(Screen::IdentityGate)));
        }
    }

    if let Some(receipt) = receipt {
        let Some(email) = ui.prompt("Invoice email (enter to skip)").await? else {
            return Ok(None);
        };
        if !email.is_empty() {
            // detached send; the receipt is final either way
            match payment_screen.request_invoice(state, &receipt, &email) {
                Ok(_handle) => ui.line(&format!("Invoice will be sent to {email}.")),
                Err(err) => ui.error(&err.user_message()),
            }
        }
    }

    let Some(_) = ui.prompt("Press enter to finish").await? else {
        return Ok(None);
    };

    match ReceiptScreen::acknowledge_and_reset(state) {
        Transition::Forward(next) => Ok(Some(next)),
        _ => Ok(Some(Screen::Catalog)),
    }
}
