//! The demo dataset served when no records file is configured.

use time::{PrimitiveDateTime, macros::datetime};

use crate::{
    Error,
    ai_alert::{AiAlert, AlertPriority, alerts_for_owner},
    owner::OwnerId,
    record::{RecordId, RecordKind, TransactionRecord},
    repository::RecordRepository,
};

const MAIN_CLIENT: OwnerId = OwnerId::new(554899999999);
const SECOND_CLIENT: OwnerId = OwnerId::new(554888888888);

/// Records and alerts held in memory.
#[derive(Debug, Clone, Default)]
pub struct FixtureRepository {
    records: Vec<TransactionRecord>,
    alerts: Vec<AiAlert>,
}

impl FixtureRepository {
    pub fn new(records: Vec<TransactionRecord>, alerts: Vec<AiAlert>) -> Self {
        Self { records, alerts }
    }

    /// Two clients' income and expenses for January and February 2024, plus
    /// five alerts for the first client.
    ///
    /// # Errors
    /// Returns an error if a demo record is invalid.
    pub fn demo() -> Result<Self, Error> {
        use RecordKind::{Expense, Income};

        #[rustfmt::skip]
        let rows: [(RecordId, OwnerId, f64, &str, &str, RecordKind, &str, PrimitiveDateTime); 28] = [
            (1, MAIN_CLIENT, 5500.0, "Client ABC", "Main Account", Income, "Website", datetime!(2024-01-15 10:00)),
            (2, MAIN_CLIENT, 3200.0, "Project X", "Main Account", Income, "Automation", datetime!(2024-01-20 14:00)),
            (3, MAIN_CLIENT, 1800.0, "Logo Design", "Main Account", Income, "Design", datetime!(2024-01-25 09:00)),
            (4, MAIN_CLIENT, 4500.0, "Client DEF", "Main Account", Income, "Website", datetime!(2024-02-05 11:00)),
            (5, MAIN_CLIENT, 2800.0, "CRM Automation", "Main Account", Income, "Automation", datetime!(2024-02-15 16:00)),
            (10, MAIN_CLIENT, 1500.0, "Main Account", "Landlord", Expense, "Rent", datetime!(2024-01-05 08:00)),
            (11, MAIN_CLIENT, 450.0, "Main Account", "Power Company", Expense, "Fixed Bills", datetime!(2024-01-10 09:00)),
            (12, MAIN_CLIENT, 800.0, "Main Account", "Supermarket", Expense, "Groceries", datetime!(2024-01-12 18:00)),
            (13, MAIN_CLIENT, 120.0, "Main Account", "Food Delivery", Expense, "Fast Food", datetime!(2024-01-14 20:00)),
            (14, MAIN_CLIENT, 350.0, "Main Account", "Rideshare", Expense, "Transport", datetime!(2024-01-18 15:00)),
            (15, MAIN_CLIENT, 280.0, "Main Account", "Pharmacy", Expense, "Health", datetime!(2024-01-20 11:00)),
            (16, MAIN_CLIENT, 200.0, "Main Account", "School Supplies", Expense, "Children", datetime!(2024-01-22 14:00)),
            (17, MAIN_CLIENT, 150.0, "Main Account", "Coworking", Expense, "Work", datetime!(2024-01-25 10:00)),
            (18, MAIN_CLIENT, 89.0, "Main Account", "Figma", Expense, "Tools", datetime!(2024-01-28 09:00)),
            (19, MAIN_CLIENT, 300.0, "Main Account", "Cinema", Expense, "Leisure & Social", datetime!(2024-01-30 22:00)),
            (20, MAIN_CLIENT, 1500.0, "Main Account", "Landlord", Expense, "Rent", datetime!(2024-02-05 08:00)),
            (21, MAIN_CLIENT, 520.0, "Main Account", "Power Company", Expense, "Fixed Bills", datetime!(2024-02-10 09:00)),
            (22, MAIN_CLIENT, 950.0, "Main Account", "Supermarket", Expense, "Groceries", datetime!(2024-02-12 18:00)),
            (23, MAIN_CLIENT, 180.0, "Main Account", "Food Delivery", Expense, "Fast Food", datetime!(2024-02-14 21:00)),
            (24, MAIN_CLIENT, 400.0, "Main Account", "Rideshare", Expense, "Transport", datetime!(2024-02-18 16:00)),
            (25, MAIN_CLIENT, 500.0, "Main Account", "Online Course", Expense, "Education", datetime!(2024-02-20 10:00)),
            (26, MAIN_CLIENT, 600.0, "Main Account", "Credit Card", Expense, "Debts", datetime!(2024-02-22 12:00)),
            (27, MAIN_CLIENT, 1000.0, "Main Account", "Savings Account", Expense, "Savings", datetime!(2024-02-25 08:00)),
            (28, MAIN_CLIENT, 250.0, "Main Account", "Travel Fund", Expense, "Goals", datetime!(2024-02-28 15:00)),
            (29, MAIN_CLIENT, 350.0, "Main Account", "Phone Repair", Expense, "Unexpected", datetime!(2024-02-28 17:00)),
            (30, SECOND_CLIENT, 8000.0, "XYZ Ltd", "Account", Income, "Website", datetime!(2024-02-01 09:00)),
            (31, SECOND_CLIENT, 2000.0, "Account", "Landlord", Expense, "Rent", datetime!(2024-02-05 10:00)),
            (32, SECOND_CLIENT, 1200.0, "Account", "Market", Expense, "Groceries", datetime!(2024-02-10 12:00)),
        ];

        let records = rows
            .into_iter()
            .map(|(id, owner, amount, from, to, kind, category, recorded_at)| {
                TransactionRecord::build(id, amount, kind, category, recorded_at.date())
                    .owner(owner)
                    .counterparties(from, to)
                    .recorded_at(recorded_at)
                    .finalise()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let alerts = [
            (
                1,
                AlertPriority::High,
                "Spending on Groceries went up 23% compared with last month. \
                Consider reviewing your shopping habits.",
                datetime!(2024-02-28 10:00),
            ),
            (
                2,
                AlertPriority::Medium,
                "You have reached 80% of your monthly Fast Food limit with 5 days left \
                in the month.",
                datetime!(2024-02-27 14:00),
            ),
            (
                3,
                AlertPriority::Low,
                "Nice work! You spent R$ 350 less on Transport this month than your average.",
                datetime!(2024-02-26 09:00),
            ),
            (
                4,
                AlertPriority::Low,
                "Your spending on Tools is consistent. Annual plans could save you up to 20%.",
                datetime!(2024-02-25 16:00),
            ),
            (
                5,
                AlertPriority::High,
                "Your emergency fund is below the recommended 3 months of expenses. \
                Currently: 1.5 months.",
                datetime!(2024-02-24 11:00),
            ),
        ]
        .into_iter()
        .map(|(id, priority, message, created_at)| AiAlert {
            id,
            owner_id: MAIN_CLIENT,
            message: message.to_owned(),
            priority,
            created_at,
        })
        .collect();

        Ok(Self::new(records, alerts))
    }
}

impl RecordRepository for FixtureRepository {
    fn list(&self, owner_id: Option<OwnerId>) -> Result<Vec<TransactionRecord>, Error> {
        Ok(self
            .records
            .iter()
            .filter(|record| record.is_owned_by(owner_id))
            .cloned()
            .collect())
    }

    fn list_alerts(&self, owner_id: Option<OwnerId>) -> Result<Vec<AiAlert>, Error> {
        Ok(alerts_for_owner(&self.alerts, owner_id))
    }
}
