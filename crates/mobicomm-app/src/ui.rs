//! Terminal rendering and input helpers
//!
//! Presentation only; everything it prints comes from the flow crate's
//! view types.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use mobicomm_core::{Category, Plan};
use mobicomm_flow::{CategoryPane, OrderSummary, PaneState, ProgressStep, ReceiptView};

/// Line-based terminal UI
pub struct Ui {
    lines: Lines<BufReader<Stdin>>,
}

impl Ui {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Prompt for one line of input; `None` means stdin closed
    pub async fn prompt(&mut self, label: &str) -> anyhow::Result<Option<String>> {
        print!("{label}: ");
        std::io::stdout().flush()?;
        Ok(self
            .lines
            .next_line()
            .await?
            .map(|line| line.trim().to_string()))
    }

    pub fn heading(&self, title: &str) {
        println!();
        println!("── {title} ──────────────────────────────");
    }

    pub fn line(&self, message: &str) {
        println!("  {message}");
    }

    /// Busy indicator for a network-bound operation
    pub fn busy(&self, message: &str) {
        println!("  … {message}");
    }

    pub fn error(&self, message: &str) {
        println!("  ✗ {message}");
    }

    fn progress(step: ProgressStep) -> &'static str {
        match step {
            ProgressStep::Plan => "[Plan] ── Pay ── Done",
            ProgressStep::Pay => "Plan ── [Pay] ── Done",
            ProgressStep::Done => "Plan ── Pay ── [Done]",
        }
    }

    fn plan_row(category: &Category, plan: &Plan) -> String {
        if category.is_top_up() {
            format!(
                "[{}] ₹{}  Talktime: {}",
                plan.plan_id,
                plan.price,
                plan.calls.as_deref().unwrap_or("N/A"),
            )
        } else {
            let mut row = format!(
                "[{}] ₹{}  Data: {} · Validity: {} · Calls: {}",
                plan.plan_id,
                plan.price,
                plan.data.as_deref().unwrap_or("N/A"),
                plan.validity.as_deref().unwrap_or("N/A"),
                plan.calls.as_deref().unwrap_or("Unlimited"),
            );
            if category.is_ott() {
                if let Some(benefits) = &plan.benefits {
                    row.push_str(&format!(" · Benefits: {benefits}"));
                }
            }
            row
        }
    }

    pub fn render_catalog(&self, panes: &[CategoryPane]) {
        if panes.is_empty() {
            self.error("No plan categories found. Please try again later.");
            return;
        }
        for pane in panes {
            println!();
            println!("  {}", pane.category.category_name);
            match &pane.state {
                PaneState::Loading => self.busy("Loading plans..."),
                PaneState::Failed(message) => self.error(message),
                PaneState::Loaded(plans) if plans.is_empty() => {
                    self.line("No plans available in this category.");
                }
                PaneState::Loaded(plans) => {
                    for plan in plans {
                        self.line(&Self::plan_row(&pane.category, plan));
                    }
                }
            }
        }
        println!();
    }

    pub fn render_results(&self, results: &[(&Category, &Plan)]) {
        if results.is_empty() {
            self.line("No matching plans found.");
            return;
        }
        for (category, plan) in results {
            self.line(&Self::plan_row(category, plan));
        }
    }

    pub fn render_summary(&self, summary: &OrderSummary) {
        self.line(Self::progress(summary.step));
        println!();
        self.line(&format!("Recharging {}", summary.mobile_display));
        self.line(&format!("Plan: {}", summary.selection.plan_name));
        if !summary.selection.data.is_empty() {
            self.line(&format!("Data: {}", summary.selection.data));
        }
        if !summary.selection.validity.is_empty() {
            self.line(&format!("Validity: {}", summary.selection.validity));
        }
        if summary.selection.calls.is_empty() {
            self.line("Calls: Unlimited calls");
        } else {
            self.line(&format!("Calls: {}", summary.selection.calls));
        }
        self.line(&format!("Total: ₹{}", summary.total));
    }

    pub fn render_receipt(&self, view: &ReceiptView) {
        self.line(Self::progress(view.step));
        println!();
        self.line("Recharge successful!");
        self.line(&format!("Number:      {}", view.mobile_display));
        self.line(&format!("Plan:        {} ({})", view.plan_name, view.price_label));
        self.line(&format!("Transaction: {}", view.transaction_id));
        self.line(&format!("Paid via:    {}", view.method_label));
        self.line(&format!("Date:        {}", view.display_date));
    }
}

impl Default for Ui {
    fn default() -> Self {
        Self::new()
    }
}
