use std::sync::Arc;

use time::Date;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, instrument, warn};

use crate::analysis;
use crate::auth::dto::{AuthSuccess, LoginRequest, RegisterRequest};
use crate::auth::services as auth_services;
use crate::error::Error;
use crate::foodlog::query::{local_today, DayView};
use crate::foodlog::services as foodlog_services;
use crate::foodlog::totals::{DailyTotalsStore, NutritionTotals};
use crate::goal::dto::NutritionGoal;
use crate::goal::form::GoalForm;
use crate::goal::services as goal_services;
use crate::http::ApiTransport;

/// Canonical user identity, normalized once from whichever shape the
/// auth response used. Nothing downstream looks at raw payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// One logged-in dashboard session.
///
/// Owns every piece of process-wide state the dashboard needs: the
/// identity, the bearer token, the running totals store, the per-date
/// day view and the cached goal. Provisioned by [`Session::login`] or
/// [`Session::register`], torn down by [`Session::logout`], which
/// consumes it; the state cannot be reached outside that window.
pub struct Session {
    user: UserIdentity,
    token: String,
    api: Arc<dyn ApiTransport>,
    day: Mutex<DayView>,
    store: RwLock<DailyTotalsStore>,
    goal: RwLock<Option<NutritionGoal>>,
    analysis_gate: Mutex<()>,
}

impl Session {
    pub async fn login(
        api: Arc<dyn ApiTransport>,
        request: &LoginRequest,
    ) -> Result<Self, Error> {
        let auth = auth_services::login(api.as_ref(), request).await?;
        Ok(Self::provision(api, auth).await)
    }

    pub async fn register(
        api: Arc<dyn ApiTransport>,
        request: &RegisterRequest,
    ) -> Result<Self, Error> {
        let auth = auth_services::register(api.as_ref(), request).await?;
        Ok(Self::provision(api, auth).await)
    }

    async fn provision(api: Arc<dyn ApiTransport>, auth: AuthSuccess) -> Self {
        let profile = auth.user.into_profile();
        let user = UserIdentity {
            id: profile.id,
            name: profile.name,
            email: profile.email,
        };
        api.authorize(&auth.token).await;
        info!(user_id = %user.id, "session provisioned");
        Self {
            day: Mutex::new(DayView::new(user.id.clone(), local_today())),
            store: RwLock::new(DailyTotalsStore::default()),
            goal: RwLock::new(None),
            analysis_gate: Mutex::new(()),
            user,
            token: auth.token,
            api,
        }
    }

    pub fn user(&self) -> &UserIdentity {
        &self.user
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub async fn selected_date(&self) -> Date {
        self.day.lock().await.selected()
    }

    /// The user's goal targets, fetched once per session and cached.
    /// Absence (no goal set yet, or the fetch failed) is not an error;
    /// progress falls back to the default targets.
    pub async fn goal(&self) -> Option<NutritionGoal> {
        if let Some(goal) = *self.goal.read().await {
            return Some(goal);
        }
        match goal_services::fetch_goal(self.api.as_ref(), &self.user.id).await {
            Ok(goal) => {
                *self.goal.write().await = Some(goal);
                Some(goal)
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch nutrition goal");
                None
            }
        }
    }

    /// Validate the goal form and submit it for calculation. Validation
    /// failures block the submission; nothing is sent.
    #[instrument(skip(self, form), fields(user_id = %self.user.id))]
    pub async fn submit_goal(&self, form: &GoalForm) -> Result<NutritionGoal, Error> {
        let request = form.build(&self.user.id)?;
        let plan = goal_services::calculate_goal(self.api.as_ref(), &request).await?;
        *self.goal.write().await = Some(plan);
        info!(calories = plan.calories, "goal updated");
        Ok(plan)
    }

    /// Switch the dashboard to `date` and fetch that day's logs.
    ///
    /// A response that comes back after the user has moved on to
    /// another date is discarded; in that case the newer selection's
    /// totals (possibly still absent) are returned instead. When the
    /// fetched day is today, the running store is replaced with the
    /// authoritative result so both derivation paths agree.
    #[instrument(skip(self), fields(user_id = %self.user.id))]
    pub async fn select_date(&self, date: Date) -> Result<Option<NutritionTotals>, Error> {
        let ticket = self.day.lock().await.select(date);
        let outcome =
            foodlog_services::fetch_day_logs(self.api.as_ref(), &self.user.id, date).await;

        let mut day = self.day.lock().await;
        match day.apply(ticket, outcome)? {
            Some(totals) => {
                if date == local_today() {
                    self.store.write().await.replace(totals);
                }
                Ok(Some(totals))
            }
            None => Ok(day.totals()),
        }
    }

    /// Analyze a free-text meal description and fold the resulting
    /// record into today's totals.
    ///
    /// Only one analysis may be in flight; a second call is rejected
    /// with [`Error::AnalysisInFlight`] rather than silently dropped.
    /// While a fetch for today is pending the call is rejected with
    /// [`Error::RefreshInFlight`] so an optimistic accumulation can
    /// never interleave with a bulk replace for the same day.
    #[instrument(skip(self, prompt), fields(user_id = %self.user.id))]
    pub async fn log_meal(&self, prompt: &str) -> Result<String, Error> {
        let _gate = self
            .analysis_gate
            .try_lock()
            .map_err(|_| Error::AnalysisInFlight)?;

        let today = local_today();
        if self.day.lock().await.is_refreshing(today) {
            return Err(Error::RefreshInFlight);
        }

        let response =
            analysis::services::analyze_meal(self.api.as_ref(), &self.user.id, prompt).await?;
        match response.food_log {
            Some(record) => {
                self.store.write().await.accumulate(&record);
                self.day.lock().await.absorb(today, &record);
                info!(food = %record.food_name, "meal logged");
                Ok(analysis::services::summarize(&record))
            }
            None => Ok(response
                .message
                .unwrap_or_else(|| "Food logged!".to_string())),
        }
    }

    /// Totals to display for the current selection.
    ///
    /// The fetched slot wins when present. For today with no fetch
    /// landed yet, the running store serves as the optimistic value
    /// once anything has been written to it. `None` means "no data",
    /// as distinct from an authoritative zero.
    pub async fn current_totals(&self) -> Option<NutritionTotals> {
        let day = self.day.lock().await;
        if let Some(totals) = day.totals() {
            return Some(totals);
        }
        if day.selected() == local_today() {
            let store = self.store.read().await;
            if store.is_provisioned() {
                return Some(store.snapshot());
            }
        }
        None
    }

    /// Tear the session down. Consuming `self` makes the store and day
    /// view unreachable afterwards.
    pub fn logout(self) {
        info!(user_id = %self.user.id, "session closed");
    }
}
