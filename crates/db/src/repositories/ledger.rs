//! Ledger repository and the posting engine.
//!
//! Every bill, collection and voucher reaches the books through
//! [`post_lines`], which runs inside the caller's database transaction.

use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, Utc};
use rentbook_core::ledger::{
    DocumentRef, LedgerBalance, LedgerError, PostingLine, PostingTotals, validate_lines,
};
use rentbook_core::reports::{TrialBalance, TrialBalanceRow};
use rentbook_shared::AppError;
use rentbook_shared::types::{HeadId, JournalEntryId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::entities::{account_journal, heads_of_accounts, ledger_current, ledger_history};

/// Error types for posting and ledger reads.
#[derive(Debug, thiserror::Error)]
pub enum PostingError {
    /// The lines or heads broke a ledger rule.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<PostingError> for AppError {
    fn from(err: PostingError) -> Self {
        match err {
            PostingError::Ledger(err) => err.into(),
            PostingError::Database(err) => Self::Database(err.to_string()),
        }
    }
}

/// A balanced set of lines to post for one document.
#[derive(Debug, Clone)]
pub struct PostingRequest {
    /// Originating document.
    pub document: DocumentRef,
    /// Business date of the document.
    pub entry_date: NaiveDate,
    /// Day whose `ledger_history` snapshot the posting updates.
    pub posted_on: NaiveDate,
    /// Lines to post.
    pub lines: Vec<PostingLine>,
}

/// Posts a document's lines to the ledger.
///
/// Runs on the caller's connection, which should be a transaction: the
/// lines are validated before anything is written, then the `ledger_current`
/// rows of every head involved are locked in head id order and moved (or
/// created), the head's `ledger_history` is brought up to date from
/// `posted_on` onwards and the journal rows are appended.
///
/// # Errors
///
/// Returns a `LedgerError` if the lines do not balance or reference an
/// unknown or inactive head, or a database error.
pub async fn post_lines<C>(
    conn: &C,
    request: PostingRequest,
) -> Result<Vec<account_journal::Model>, PostingError>
where
    C: ConnectionTrait,
{
    let totals = validate_lines(&request.lines)?;
    ensure_heads_postable(conn, &request.lines).await?;

    let now = Utc::now().into();

    let mut by_head: BTreeMap<Uuid, Vec<&PostingLine>> = BTreeMap::new();
    for line in &request.lines {
        by_head.entry(line.head_id.into_inner()).or_default().push(line);
    }

    let mut current: HashMap<Uuid, ledger_current::Model> = ledger_current::Entity::find()
        .filter(ledger_current::Column::HeadId.is_in(by_head.keys().copied()))
        .order_by_asc(ledger_current::Column::HeadId)
        .lock_exclusive()
        .all(conn)
        .await?
        .into_iter()
        .map(|row| (row.head_id, row))
        .collect();

    for (head_id, lines) in &by_head {
        let balance = match current.remove(head_id) {
            Some(row) => {
                let balance = apply_lines(row.balance(), lines);
                let mut active: ledger_current::ActiveModel = row.into();
                active.amount = Set(balance.amount);
                active.dr_cr = Set(balance.dr_cr.into());
                active.updated_at = Set(now);
                active.update(conn).await?;
                balance
            }
            None => {
                let balance = apply_lines(LedgerBalance::zero(), lines);
                ledger_current::ActiveModel {
                    id: Set(Uuid::now_v7()),
                    head_id: Set(*head_id),
                    amount: Set(balance.amount),
                    dr_cr: Set(balance.dr_cr.into()),
                    updated_at: Set(now),
                }
                .insert(conn)
                .await?;
                balance
            }
        };

        let snapshot = update_history(conn, *head_id, request.posted_on, lines, now).await?;

        debug!(
            head_id = %head_id,
            lines = lines.len(),
            balance = %balance.amount,
            side = %balance.dr_cr,
            snapshot = %snapshot.amount,
            snapshot_side = %snapshot.dr_cr,
            "Ledger head updated"
        );
    }

    let (bill_id, collection_id, voucher_id) = request.document.columns();
    let mut journal = Vec::with_capacity(request.lines.len());
    for line in &request.lines {
        let row = account_journal::ActiveModel {
            id: Set(JournalEntryId::new().into_inner()),
            head_id: Set(line.head_id.into_inner()),
            entry_date: Set(request.entry_date),
            posted_on: Set(request.posted_on),
            dr_cr: Set(line.dr_cr.into()),
            amount: Set(line.amount),
            narration: Set(line.narration.clone()),
            bill_id: Set(bill_id),
            collection_id: Set(collection_id),
            voucher_id: Set(voucher_id),
            created_at: Set(now),
        }
        .insert(conn)
        .await?;
        journal.push(row);
    }

    info!(
        document = %request.document,
        lines = journal.len(),
        total = %totals.debit,
        posted_on = %request.posted_on,
        "Posting committed to ledger"
    );

    Ok(journal)
}

fn apply_lines(start: LedgerBalance, lines: &[&PostingLine]) -> LedgerBalance {
    lines
        .iter()
        .fold(start, |balance, line| balance.apply(line.dr_cr, line.amount))
}

/// Brings a head's snapshots up to date with lines posted on `posted_on`.
///
/// The `posted_on` snapshot becomes the closest earlier snapshot plus the
/// lines, and every later snapshot moves by the same lines, so a posting
/// dated before existing ones leaves each snapshot equal to the journal up
/// to its date. Returns the `posted_on` snapshot.
async fn update_history<C>(
    conn: &C,
    head_id: Uuid,
    posted_on: NaiveDate,
    lines: &[&PostingLine],
    now: chrono::DateTime<chrono::FixedOffset>,
) -> Result<LedgerBalance, DbErr>
where
    C: ConnectionTrait,
{
    let prior = ledger_history::Entity::find()
        .filter(ledger_history::Column::HeadId.eq(head_id))
        .filter(ledger_history::Column::SnapshotDate.lte(posted_on))
        .order_by_desc(ledger_history::Column::SnapshotDate)
        .limit(1)
        .one(conn)
        .await?;

    let snapshot = match prior {
        Some(row) if row.snapshot_date == posted_on => {
            let balance = apply_lines(row.balance(), lines);
            let mut active: ledger_history::ActiveModel = row.into();
            active.amount = Set(balance.amount);
            active.dr_cr = Set(balance.dr_cr.into());
            active.update(conn).await?;
            balance
        }
        prior => {
            let start = prior.map_or_else(LedgerBalance::zero, |row| row.balance());
            let balance = apply_lines(start, lines);
            ledger_history::ActiveModel {
                id: Set(Uuid::now_v7()),
                head_id: Set(head_id),
                snapshot_date: Set(posted_on),
                amount: Set(balance.amount),
                dr_cr: Set(balance.dr_cr.into()),
                created_at: Set(now),
            }
            .insert(conn)
            .await?;
            balance
        }
    };

    let later = ledger_history::Entity::find()
        .filter(ledger_history::Column::HeadId.eq(head_id))
        .filter(ledger_history::Column::SnapshotDate.gt(posted_on))
        .all(conn)
        .await?;
    for row in later {
        let balance = apply_lines(row.balance(), lines);
        let mut active: ledger_history::ActiveModel = row.into();
        active.amount = Set(balance.amount);
        active.dr_cr = Set(balance.dr_cr.into());
        active.update(conn).await?;
    }

    Ok(snapshot)
}

/// Rejects lines that reference unknown or inactive heads.
async fn ensure_heads_postable<C>(conn: &C, lines: &[PostingLine]) -> Result<(), PostingError>
where
    C: ConnectionTrait,
{
    let ids: Vec<Uuid> = lines.iter().map(|line| line.head_id.into_inner()).collect();
    let heads: HashMap<Uuid, heads_of_accounts::Model> = heads_of_accounts::Entity::find()
        .filter(heads_of_accounts::Column::Id.is_in(ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|head| (head.id, head))
        .collect();

    for line in lines {
        match heads.get(&line.head_id.into_inner()) {
            None => {
                warn!(head_id = %line.head_id, "Posting rejected: unknown head");
                return Err(LedgerError::HeadNotFound(line.head_id).into());
            }
            Some(head) if !head.is_active => {
                warn!(head_id = %line.head_id, code = %head.code, "Posting rejected: inactive head");
                return Err(LedgerError::HeadInactive(line.head_id).into());
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// A head whose stored balance disagrees with its journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceMismatch {
    /// Head identifier.
    pub head_id: HeadId,
    /// Head code.
    pub code: String,
    /// Balance held in `ledger_current`.
    pub stored: LedgerBalance,
    /// Balance recomputed from `account_journal`.
    pub computed: LedgerBalance,
}

/// Result of reconciling the ledger against its journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    /// Number of heads checked.
    pub heads_checked: usize,
    /// Heads whose stored balance is wrong.
    pub mismatches: Vec<BalanceMismatch>,
    /// Journal debit total.
    pub journal_debit: Decimal,
    /// Journal credit total.
    pub journal_credit: Decimal,
    /// Whether the journal debits equal its credits.
    pub journal_balanced: bool,
}

impl VerifyReport {
    /// Returns true if the ledger is fully consistent.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.journal_balanced && self.mismatches.is_empty()
    }
}

/// Ledger repository for balance reads and reconciliation.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets a head's balance.
    ///
    /// Without a date this is the live `ledger_current` balance; with one it
    /// is the latest snapshot on or before that date. A head never posted
    /// to has a zero balance.
    ///
    /// # Errors
    ///
    /// Returns `HeadNotFound` for an unknown head, or a database error.
    pub async fn get_ledger_balance(
        &self,
        head_id: HeadId,
        as_of: Option<NaiveDate>,
    ) -> Result<LedgerBalance, PostingError> {
        let head = heads_of_accounts::Entity::find_by_id(head_id.into_inner())
            .one(&self.db)
            .await?;
        if head.is_none() {
            return Err(LedgerError::HeadNotFound(head_id).into());
        }

        let balance = match as_of {
            None => ledger_current::Entity::find()
                .filter(ledger_current::Column::HeadId.eq(head_id.into_inner()))
                .one(&self.db)
                .await?
                .map(|row| row.balance()),
            Some(date) => ledger_history::Entity::find()
                .filter(ledger_history::Column::HeadId.eq(head_id.into_inner()))
                .filter(ledger_history::Column::SnapshotDate.lte(date))
                .order_by_desc(ledger_history::Column::SnapshotDate)
                .limit(1)
                .one(&self.db)
                .await?
                .map(|row| row.balance()),
        };

        Ok(balance.unwrap_or_default())
    }

    /// Builds the trial balance, live or as of a date.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn get_trial_balance(
        &self,
        as_of: Option<NaiveDate>,
    ) -> Result<TrialBalance, PostingError> {
        let heads = heads_of_accounts::Entity::find()
            .order_by_asc(heads_of_accounts::Column::Code)
            .all(&self.db)
            .await?;

        let balances: HashMap<Uuid, LedgerBalance> = match as_of {
            None => ledger_current::Entity::find()
                .all(&self.db)
                .await?
                .into_iter()
                .map(|row| (row.head_id, row.balance()))
                .collect(),
            Some(date) => ledger_history::Entity::find()
                .filter(ledger_history::Column::SnapshotDate.lte(date))
                .order_by_asc(ledger_history::Column::SnapshotDate)
                .all(&self.db)
                .await?
                .into_iter()
                .map(|row| (row.head_id, row.balance()))
                .collect(),
        };

        let rows = heads
            .into_iter()
            .filter_map(|head| {
                let balance = balances.get(&head.id).copied()?;
                Some(TrialBalanceRow::from_balance(
                    HeadId::from_uuid(head.id),
                    head.code,
                    head.name,
                    head.head_type.into(),
                    balance,
                ))
            })
            .collect();

        let date = as_of.unwrap_or_else(|| Utc::now().date_naive());
        let trial_balance = TrialBalance::build(date, rows);
        if !trial_balance.is_balanced {
            warn!(
                as_of = %date,
                debit = %trial_balance.total_debit,
                credit = %trial_balance.total_credit,
                "Trial balance does not balance"
            );
        }
        Ok(trial_balance)
    }

    /// Lists the journal rows posted for a document, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn journal_for_document(
        &self,
        document: DocumentRef,
    ) -> Result<Vec<account_journal::Model>, PostingError> {
        journal_for_document(&self.db, document).await
    }

    /// Recomputes every head's balance from the journal and compares it to
    /// `ledger_current`.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn verify(&self) -> Result<VerifyReport, PostingError> {
        let heads = heads_of_accounts::Entity::find()
            .order_by_asc(heads_of_accounts::Column::Code)
            .all(&self.db)
            .await?;
        let journal = account_journal::Entity::find().all(&self.db).await?;
        let stored: HashMap<Uuid, LedgerBalance> = ledger_current::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|row| (row.head_id, row.balance()))
            .collect();

        let lines: Vec<PostingLine> = journal
            .iter()
            .map(account_journal::Model::posting_line)
            .collect();
        let totals = PostingTotals::from_lines(&lines);

        let mut computed: BTreeMap<Uuid, Decimal> = BTreeMap::new();
        for line in &lines {
            *computed.entry(line.head_id.into_inner()).or_insert(Decimal::ZERO) +=
                LedgerBalance::opening(line.dr_cr, line.amount).signed();
        }

        let mut mismatches = Vec::new();
        for head in &heads {
            let stored_balance = stored.get(&head.id).copied().unwrap_or_default();
            let computed_signed = computed.get(&head.id).copied().unwrap_or(Decimal::ZERO);
            if stored_balance.signed() != computed_signed {
                mismatches.push(BalanceMismatch {
                    head_id: HeadId::from_uuid(head.id),
                    code: head.code.clone(),
                    stored: stored_balance,
                    computed: LedgerBalance::from_signed(computed_signed),
                });
            }
        }

        let report = VerifyReport {
            heads_checked: heads.len(),
            mismatches,
            journal_debit: totals.debit,
            journal_credit: totals.credit,
            journal_balanced: totals.is_balanced,
        };

        if report.is_consistent() {
            info!(heads = report.heads_checked, "Ledger verified against journal");
        } else {
            warn!(
                mismatches = report.mismatches.len(),
                journal_balanced = report.journal_balanced,
                "Ledger disagrees with journal"
            );
        }
        Ok(report)
    }
}

/// Journal rows of one document on any connection.
pub(crate) async fn journal_for_document<C>(
    conn: &C,
    document: DocumentRef,
) -> Result<Vec<account_journal::Model>, PostingError>
where
    C: ConnectionTrait,
{
    let rows = account_journal::Entity::find()
        .filter(account_journal::document_filter(&document))
        .order_by_asc(account_journal::Column::CreatedAt)
        .order_by_asc(account_journal::Column::Id)
        .all(conn)
        .await?;
    Ok(rows)
}
