//! Session context: the five collections plus injected gateway, ids and clock.
//!
//! A [`Session`] is loaded once, then every successful mutation writes all
//! collections back through the [`PersistenceGateway`]. Operations that fail
//! (role denial, unknown id, bad input) mutate nothing and write nothing.
//! A mutation whose save fails is rolled back in memory.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::audit::{self, recorder};
use crate::catalog::{CatalogProvider, NewStandard, StandardsCatalog};
use crate::error::{AuditError, Result};
use crate::ids::{Clock, IdGenerator};
use crate::lifecycle::{self, Annotation, Assignment, Opened};
use crate::store::{self, PersistenceGateway};
use crate::summary::{self, PlanFilter, PlanView, Summary};
use crate::types::{
    Audit, AuditItem, ComplianceState, PlanState, RemediationPlan, Standard, User,
};
use crate::users::{self, Registration};

/// Loaded application state.
pub struct Session {
    provider: CatalogProvider,
    standards: StandardsCatalog,
    users: Vec<User>,
    audits: Vec<Audit>,
    items: Vec<AuditItem>,
    plans: Vec<RemediationPlan>,
    gateway: Box<dyn PersistenceGateway>,
    ids: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
}

/// In-memory copy of every collection, restored when a save fails.
#[derive(Clone)]
struct Collections {
    standards: StandardsCatalog,
    users: Vec<User>,
    audits: Vec<Audit>,
    items: Vec<AuditItem>,
    plans: Vec<RemediationPlan>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("standards", &self.standards.len())
            .field("users", &self.users.len())
            .field("audits", &self.audits.len())
            .field("items", &self.items.len())
            .field("plans", &self.plans.len())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Load every collection from `gateway`.
    ///
    /// Missing or corrupt snapshots start empty, except standards, which
    /// start from the provider's seed list.
    ///
    /// # Errors
    ///
    /// [`AuditError::Storage`] when the gateway cannot be read.
    pub fn load(
        provider: CatalogProvider,
        gateway: Box<dyn PersistenceGateway>,
        ids: Box<dyn IdGenerator>,
        clock: Box<dyn Clock>,
    ) -> Result<Self> {
        let gw = gateway.as_ref();
        let standards = store::load_or(gw, store::STANDARDS, provider.initial_standards.clone())?;
        let users: Vec<User> = store::load_or(gw, store::USERS, Vec::new())?;
        let audits: Vec<Audit> = store::load_or(gw, store::AUDITS, Vec::new())?;
        let items: Vec<AuditItem> = store::load_or(gw, store::ITEMS, Vec::new())?;
        let plans: Vec<RemediationPlan> = store::load_or(gw, store::PLANS, Vec::new())?;

        debug!(
            standards = standards.len(),
            users = users.len(),
            audits = audits.len(),
            items = items.len(),
            plans = plans.len(),
            "session loaded"
        );

        Ok(Self {
            provider,
            standards: StandardsCatalog::new(standards),
            users,
            audits,
            items,
            plans,
            gateway,
            ids,
            clock,
        })
    }

    /// Write all five collections.
    ///
    /// # Errors
    ///
    /// [`AuditError::Storage`] on the first failed write.
    pub fn save(&mut self) -> Result<()> {
        let gw = self.gateway.as_mut();
        store::save(gw, store::USERS, &self.users)?;
        store::save(gw, store::AUDITS, &self.audits)?;
        store::save(gw, store::ITEMS, &self.items)?;
        store::save(gw, store::PLANS, &self.plans)?;
        store::save(gw, store::STANDARDS, self.standards.all())?;
        Ok(())
    }

    fn collections(&self) -> Collections {
        Collections {
            standards: self.standards.clone(),
            users: self.users.clone(),
            audits: self.audits.clone(),
            items: self.items.clone(),
            plans: self.plans.clone(),
        }
    }

    /// Save, or put `before` back and return the save error.
    ///
    /// After a rollback the previous state is written again so that keys
    /// saved before the failure do not stay ahead of the others.
    fn commit(&mut self, before: Collections) -> Result<()> {
        let Err(e) = self.save() else {
            return Ok(());
        };
        warn!(error = %e, "save failed, rolling back");
        self.standards = before.standards;
        self.users = before.users;
        self.audits = before.audits;
        self.items = before.items;
        self.plans = before.plans;
        if let Err(again) = self.save() {
            warn!(error = %again, "could not rewrite previous snapshots");
        }
        Err(e)
    }

    /// The gateway snapshots are written to.
    pub fn gateway(&self) -> &dyn PersistenceGateway {
        self.gateway.as_ref()
    }

    /// Release the gateway, dropping in-memory state.
    pub fn into_gateway(self) -> Box<dyn PersistenceGateway> {
        self.gateway
    }

    /// Reference data this session was loaded with.
    pub fn provider(&self) -> &CatalogProvider {
        &self.provider
    }

    /// Today according to the injected clock.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    // -- users --------------------------------------------------------------

    /// Registered users in registration order.
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Register a user and persist.
    ///
    /// # Errors
    ///
    /// See [`users::register`], plus [`AuditError::Storage`].
    pub fn register(&mut self, input: Registration) -> Result<&User> {
        let before = self.collections();
        let id = users::register(&mut self.users, &self.provider, input, self.ids.as_mut())?
            .id
            .clone();
        self.commit(before)?;
        self.user(&id)
    }

    /// Look a user up by email.
    pub fn find_user(&self, email: &str) -> Option<&User> {
        users::find_user(&self.users, email)
    }

    fn user(&self, id: &str) -> Result<&User> {
        self.users
            .iter()
            .find(|u| u.id == id)
            .ok_or_else(|| AuditError::not_found("user", id))
    }

    /// The acting user: the one with `email`, or the first registered.
    ///
    /// # Errors
    ///
    /// [`AuditError::NotFound`] when no such user exists.
    pub fn acting_user(&self, email: Option<&str>) -> Result<User> {
        let found = match email {
            Some(email) => self.find_user(email),
            None => self.users.first(),
        };
        found
            .cloned()
            .ok_or_else(|| AuditError::not_found("user", email.unwrap_or("(none registered)")))
    }

    // -- audits -------------------------------------------------------------

    /// Create an audit of `area` dated today, with its checklist, and persist.
    ///
    /// # Errors
    ///
    /// [`AuditError::Permission`] unless `actor` is an Auditor.
    pub fn create_audit(&mut self, actor: &User, area: &str) -> Result<&Audit> {
        let before = self.collections();
        let created = audit::create_audit(
            actor,
            self.clock.today(),
            area,
            &self.provider,
            &self.standards,
            self.ids.as_mut(),
        )?;
        let id = created.audit.id.clone();
        self.audits.push(created.audit);
        self.items.extend(created.items);
        self.commit(before)?;
        self.audit(&id)
    }

    /// All audits in creation order.
    pub fn audits(&self) -> &[Audit] {
        &self.audits
    }

    /// Audits most recent first.
    pub fn recent_audits(&self) -> Vec<&Audit> {
        audit::recent_first(&self.audits)
    }

    /// One audit by id.
    ///
    /// # Errors
    ///
    /// [`AuditError::NotFound`] for an unknown id.
    pub fn audit(&self, id: &str) -> Result<&Audit> {
        self.audits
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| AuditError::not_found("audit", id))
    }

    /// Checklist of one audit.
    ///
    /// # Errors
    ///
    /// [`AuditError::NotFound`] for an unknown audit id.
    pub fn items_for_audit(&self, audit_id: &str) -> Result<Vec<&AuditItem>> {
        self.audit(audit_id)?;
        Ok(audit::items_for_audit(&self.items, audit_id))
    }

    /// All audit items.
    pub fn items(&self) -> &[AuditItem] {
        &self.items
    }

    fn item(&self, id: &str) -> Result<&AuditItem> {
        self.items
            .iter()
            .find(|i| i.id == id)
            .ok_or_else(|| AuditError::not_found("item", id))
    }

    /// Record SI / NO / NA on an item and persist.
    ///
    /// # Errors
    ///
    /// [`AuditError::NotFound`] for an unknown item.
    pub fn set_compliance(
        &mut self,
        actor: &User,
        item_id: &str,
        value: ComplianceState,
    ) -> Result<&AuditItem> {
        let before = self.collections();
        recorder::set_compliance(&mut self.items, actor, item_id, value)?;
        self.commit(before)?;
        self.item(item_id)
    }

    /// Replace an item's observation and persist.
    ///
    /// # Errors
    ///
    /// [`AuditError::NotFound`] for an unknown item.
    pub fn set_observation(&mut self, actor: &User, item_id: &str, text: &str) -> Result<&AuditItem> {
        let before = self.collections();
        recorder::set_observation(&mut self.items, actor, item_id, text)?;
        self.commit(before)?;
        self.item(item_id)
    }

    /// Replace an item's evidence link and persist.
    ///
    /// # Errors
    ///
    /// [`AuditError::NotFound`] for an unknown item.
    pub fn set_evidence_url(&mut self, actor: &User, item_id: &str, url: &str) -> Result<&AuditItem> {
        let before = self.collections();
        recorder::set_evidence_url(&mut self.items, actor, item_id, url)?;
        self.commit(before)?;
        self.item(item_id)
    }

    // -- plans --------------------------------------------------------------

    /// All plans in creation order.
    pub fn plans(&self) -> &[RemediationPlan] {
        &self.plans
    }

    /// One plan by id.
    ///
    /// # Errors
    ///
    /// [`AuditError::NotFound`] for an unknown id.
    pub fn plan(&self, id: &str) -> Result<&RemediationPlan> {
        self.plans
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| AuditError::not_found("plan", id))
    }

    /// Open the plan of `item_id`, persisting only when it is created.
    ///
    /// # Errors
    ///
    /// [`AuditError::NotFound`] for an unknown item.
    pub fn open_plan(&mut self, actor: &User, item_id: &str) -> Result<Opened<'_>> {
        let before = self.collections();
        let (plan_id, created) = {
            let opened = lifecycle::get_or_create(
                &mut self.plans,
                &self.items,
                actor,
                item_id,
                self.ids.as_mut(),
            )?;
            (opened.plan.id.clone(), opened.created)
        };
        if created {
            self.commit(before)?;
        }
        Ok(Opened {
            plan: self.plan(&plan_id)?,
            created,
        })
    }

    /// Assign a responsible or a date and persist.
    ///
    /// # Errors
    ///
    /// See [`lifecycle::assign`].
    pub fn assign_plan(
        &mut self,
        actor: &User,
        plan_id: &str,
        assignment: Assignment,
    ) -> Result<&RemediationPlan> {
        let before = self.collections();
        lifecycle::assign(&mut self.plans, actor, plan_id, assignment)?;
        self.commit(before)?;
        self.plan(plan_id)
    }

    /// Move a plan to another state and persist.
    ///
    /// # Errors
    ///
    /// See [`lifecycle::set_state`].
    pub fn set_plan_state(
        &mut self,
        actor: &User,
        plan_id: &str,
        state: PlanState,
    ) -> Result<&RemediationPlan> {
        let before = self.collections();
        lifecycle::set_state(&mut self.plans, actor, plan_id, state)?;
        self.commit(before)?;
        self.plan(plan_id)
    }

    /// Grant a new close date and persist.
    ///
    /// # Errors
    ///
    /// See [`lifecycle::reprogram`].
    pub fn reprogram_plan(
        &mut self,
        actor: &User,
        plan_id: &str,
        new_close_date: NaiveDate,
    ) -> Result<&RemediationPlan> {
        let before = self.collections();
        lifecycle::reprogram(&mut self.plans, actor, plan_id, new_close_date)?;
        self.commit(before)?;
        self.plan(plan_id)
    }

    /// Verify a plan as of today and persist.
    ///
    /// # Errors
    ///
    /// See [`lifecycle::verify`].
    pub fn verify_plan(&mut self, actor: &User, plan_id: &str) -> Result<&RemediationPlan> {
        let before = self.collections();
        let today = self.clock.today();
        lifecycle::verify(&mut self.plans, actor, plan_id, today)?;
        self.commit(before)?;
        self.plan(plan_id)
    }

    /// Overwrite a free-text plan field and persist.
    ///
    /// # Errors
    ///
    /// See [`lifecycle::annotate`].
    pub fn annotate_plan(
        &mut self,
        actor: &User,
        plan_id: &str,
        annotation: Annotation,
    ) -> Result<&RemediationPlan> {
        let before = self.collections();
        lifecycle::annotate(&mut self.plans, actor, plan_id, annotation)?;
        self.commit(before)?;
        self.plan(plan_id)
    }

    /// Plans passing `filter`, joined with their items.
    pub fn plan_views(&self, filter: &PlanFilter) -> Vec<PlanView<'_>> {
        let plans = summary::filter_plans(&self.plans, filter);
        summary::plan_views(&plans, &self.items)
    }

    /// Distinct responsible actions for the filter picker.
    pub fn responsible_options(&self) -> Vec<&str> {
        summary::responsible_options(&self.plans)
    }

    /// Dashboard counters.
    pub fn summary(&self) -> Summary {
        summary::summary(&self.audits, &self.items, &self.plans)
    }

    // -- standards ----------------------------------------------------------

    /// The standards collection.
    pub fn standards(&self) -> &StandardsCatalog {
        &self.standards
    }

    /// Add a standard and persist.
    ///
    /// # Errors
    ///
    /// See [`StandardsCatalog::add_standard`].
    pub fn add_standard(&mut self, actor: &User, input: NewStandard) -> Result<&Standard> {
        let before = self.collections();
        let id = self
            .standards
            .add_standard(actor, input, &self.provider, self.ids.as_mut())?
            .id
            .clone();
        self.commit(before)?;
        info!(standard_id = %id, total = self.standards.len(), "standards catalog saved");
        self.standards
            .get(&id)
            .ok_or_else(|| AuditError::not_found("standard", &id))
    }
}
