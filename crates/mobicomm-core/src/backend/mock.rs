//! Mock Backend
//!
//! For tests and demos. Serves a small seeded catalog, recognizes a fixed
//! subscriber list, and counts every call so tests can assert that
//! fail-closed paths made zero network requests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use uuid::Uuid;

use super::{InvoiceRequest, MobileValidation, RechargeBackend, RechargeRequest};
use crate::error::{RechargeError, Result};
use crate::identity::{MobileNumber, SessionToken};
use crate::plan::{Category, Plan};

/// Mock backend with a seeded catalog and scripted failures
pub struct MockBackend {
    subscribers: HashSet<String>,
    categories: Vec<Category>,
    plans: HashMap<i64, Vec<Plan>>,
    failing_categories: HashSet<i64>,
    fail_validation: bool,
    fail_submission: bool,
    fail_invoice: bool,

    validate_calls: AtomicUsize,
    category_calls: AtomicUsize,
    plan_calls: AtomicUsize,
    submit_calls: AtomicUsize,
    invoice_calls: AtomicUsize,

    recharges: Mutex<Vec<RechargeRequest>>,
    invoices: Mutex<Vec<InvoiceRequest>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    pub fn new() -> Self {
        let categories = vec![
            Category { category_id: 1, category_name: "Data Packs".into() },
            Category { category_id: 2, category_name: "Top-up Vouchers".into() },
            Category { category_id: 3, category_name: "OTT Packs".into() },
        ];

        let mut plans = HashMap::new();
        plans.insert(
            1,
            vec![
                Plan {
                    plan_id: 1,
                    price: dec!(199),
                    data: Some("1GB/day".into()),
                    validity: Some("24 days".into()),
                    calls: Some("Unlimited".into()),
                    benefits: None,
                },
                Plan {
                    plan_id: 3,
                    price: dec!(299),
                    data: Some("2GB/day".into()),
                    validity: Some("28 days".into()),
                    calls: Some("Unlimited".into()),
                    benefits: None,
                },
                Plan {
                    plan_id: 5,
                    price: dec!(499),
                    data: Some("3GB/day".into()),
                    validity: Some("56 days".into()),
                    calls: Some("Unlimited".into()),
                    benefits: None,
                },
            ],
        );
        plans.insert(
            2,
            vec![Plan {
                plan_id: 7,
                price: dec!(100),
                data: None,
                validity: None,
                calls: Some("₹81.75 talktime".into()),
                benefits: None,
            }],
        );
        plans.insert(
            3,
            vec![Plan {
                plan_id: 9,
                price: dec!(599),
                data: Some("2GB/day".into()),
                validity: Some("28 days".into()),
                calls: Some("Unlimited".into()),
                benefits: Some("Netflix + Hotstar".into()),
            }],
        );

        Self {
            subscribers: ["9876543210", "9123456789", "8765432109"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            categories,
            plans,
            failing_categories: HashSet::new(),
            fail_validation: false,
            fail_submission: false,
            fail_invoice: false,
            validate_calls: AtomicUsize::new(0),
            category_calls: AtomicUsize::new(0),
            plan_calls: AtomicUsize::new(0),
            submit_calls: AtomicUsize::new(0),
            invoice_calls: AtomicUsize::new(0),
            recharges: Mutex::new(Vec::new()),
            invoices: Mutex::new(Vec::new()),
        }
    }

    /// Script a plan-load failure for one category
    pub fn with_failing_category(mut self, category_id: i64) -> Self {
        self.failing_categories.insert(category_id);
        self
    }

    /// Script a transport failure on validate-mobile
    pub fn with_validation_outage(mut self) -> Self {
        self.fail_validation = true;
        self
    }

    /// Script a failure on recharge submission
    pub fn with_submission_failure(mut self) -> Self {
        self.fail_submission = true;
        self
    }

    /// Script a failure on the invoice email
    pub fn with_invoice_failure(mut self) -> Self {
        self.fail_invoice = true;
        self
    }

    pub fn validate_calls(&self) -> usize {
        self.validate_calls.load(Ordering::SeqCst)
    }

    pub fn category_calls(&self) -> usize {
        self.category_calls.load(Ordering::SeqCst)
    }

    pub fn plan_calls(&self) -> usize {
        self.plan_calls.load(Ordering::SeqCst)
    }

    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn invoice_calls(&self) -> usize {
        self.invoice_calls.load(Ordering::SeqCst)
    }

    /// Recharge requests received, in order
    pub fn recharges(&self) -> Vec<RechargeRequest> {
        self.recharges.lock().unwrap().clone()
    }

    /// Invoice requests received, in order
    pub fn invoices(&self) -> Vec<InvoiceRequest> {
        self.invoices.lock().unwrap().clone()
    }
}

#[async_trait]
impl RechargeBackend for MockBackend {
    async fn validate_mobile(&self, mobile: &MobileNumber) -> Result<MobileValidation> {
        self.validate_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_validation {
            return Err(RechargeError::Network("connection refused".into()));
        }
        let token = self
            .subscribers
            .contains(mobile.as_str())
            .then(|| Uuid::new_v4().to_string());
        Ok(MobileValidation { token })
    }

    async fn categories(&self) -> Result<Vec<Category>> {
        self.category_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.categories.clone())
    }

    async fn plans(&self, category_id: i64) -> Result<Vec<Plan>> {
        self.plan_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_categories.contains(&category_id) {
            return Err(RechargeError::Backend {
                status: 500,
                message: format!("plans unavailable for category {category_id}"),
            });
        }
        Ok(self.plans.get(&category_id).cloned().unwrap_or_default())
    }

    async fn submit_recharge(
        &self,
        _token: &SessionToken,
        request: &RechargeRequest,
    ) -> Result<Value> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_submission {
            return Err(RechargeError::Backend {
                status: 502,
                message: "settlement unavailable".into(),
            });
        }
        self.recharges.lock().unwrap().push(request.clone());
        Ok(json!({
            "mobileNumber": request.mobile_number,
            "planId": request.plan_id,
            "paymentStatus": request.payment_status,
            "transactionDate": request.transaction_date,
        }))
    }

    async fn send_invoice(&self, request: &InvoiceRequest) -> Result<()> {
        self.invoice_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_invoice {
            return Err(RechargeError::Backend {
                status: 500,
                message: "mail relay down".into(),
            });
        }
        self.invoices.lock().unwrap().push(request.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "MockBackend"
    }
}
