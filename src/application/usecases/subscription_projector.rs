//! Pure projection of subscription records into what the subscription pages display.

use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use crate::domain::{
    entities::{plans::PlanEntity, subscriptions::SubscriptionEntity},
    errors::{ReportingError, ReportingResult},
    value_objects::{
        enums::{billing_periods::BillingPeriod, subscription_statuses::SubscriptionStatus},
        plans::{PlanFeatures, PlanSummary, PriceDisplay, YearlySavings, format_money},
        subscriptions::{
            FeatureAvailability, NO_PLAN_NAME, PlanAction, PlanActionItem, PlanCard,
            SELECT_PLAN_CALL_TO_ACTION, SubscriptionViewModel,
        },
    },
};

pub fn project(
    record: Option<&SubscriptionEntity>,
    catalog: &[PlanEntity],
    now: DateTime<Utc>,
) -> SubscriptionViewModel {
    let status = record
        .map(|record| SubscriptionStatus::from_str(&record.status))
        .unwrap_or_default();

    let record = match (status, record) {
        (SubscriptionStatus::Active | SubscriptionStatus::Cancelled, Some(record)) => record,
        _ => return select_plan_view(catalog),
    };

    let plan = match resolve_plan(record.plan_id, catalog) {
        Ok(plan) => Some(plan),
        Err(err) => {
            warn!(
                user_id = %record.user_id,
                plan_id = ?record.plan_id,
                error = %err,
                "subscription_projector: plan reference unresolved, showing placeholder"
            );
            None
        }
    };

    let features = plan
        .map(|plan| feature_comparison(&plan.features))
        .unwrap_or_default();

    match status {
        SubscriptionStatus::Active => SubscriptionViewModel {
            status,
            plan_name: plan_name(plan),
            plan: plan.map(plan_summary),
            billing_period: Some(
                BillingPeriod::from_str(&record.billing_period).unwrap_or_default(),
            ),
            start_date: record.starts_at,
            next_payment: record.ends_at,
            end_date: None,
            remaining_days: None,
            features,
            actions: catalog_actions(plan, catalog),
            call_to_action: None,
            show_plan_selector: plan_selector_visible(status),
        },
        _ => SubscriptionViewModel {
            status,
            plan_name: plan_name(plan),
            plan: plan.map(plan_summary),
            billing_period: BillingPeriod::from_str(&record.billing_period),
            start_date: record.starts_at,
            next_payment: None,
            end_date: record.ends_at,
            remaining_days: Some(record.ends_at.map_or(0, |end| remaining_days(end, now))),
            features,
            actions: catalog_actions(None, catalog),
            call_to_action: None,
            show_plan_selector: plan_selector_visible(status),
        },
    }
}

fn select_plan_view(catalog: &[PlanEntity]) -> SubscriptionViewModel {
    SubscriptionViewModel {
        status: SubscriptionStatus::Inactive,
        plan_name: NO_PLAN_NAME.to_string(),
        plan: None,
        billing_period: None,
        start_date: None,
        next_payment: None,
        end_date: None,
        remaining_days: None,
        features: Vec::new(),
        actions: catalog_actions(None, catalog),
        call_to_action: Some(SELECT_PLAN_CALL_TO_ACTION),
        show_plan_selector: plan_selector_visible(SubscriptionStatus::Inactive),
    }
}

pub fn resolve_plan(plan_id: Option<Uuid>, catalog: &[PlanEntity]) -> ReportingResult<&PlanEntity> {
    let plan_id = plan_id.ok_or_else(|| ReportingError::NotFound("plan".to_string()))?;
    catalog
        .iter()
        .find(|plan| plan.id == plan_id)
        .ok_or_else(|| ReportingError::NotFound(format!("plan {plan_id}")))
}

fn plan_name(plan: Option<&PlanEntity>) -> String {
    plan.map_or_else(|| NO_PLAN_NAME.to_string(), |plan| plan.name.clone())
}

/// Whole calendar days until `end`, never negative.
pub fn remaining_days(end: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (end.date_naive() - now.date_naive()).num_days().max(0)
}

pub fn compute_yearly_savings(plan: &PlanEntity) -> YearlySavings {
    if plan.monthly_price_minor <= 0 {
        return YearlySavings {
            percent: 0,
            mispriced: true,
        };
    }

    let twelve_months = plan.monthly_price_minor * 12;
    let ratio = plan.yearly_price_minor as f64 / twelve_months as f64;

    YearlySavings {
        percent: ((1.0 - ratio) * 100.0).round() as i64,
        mispriced: plan.yearly_price_minor > twelve_months,
    }
}

pub fn billing_toggle(is_yearly: bool, plan: &PlanEntity) -> PriceDisplay {
    if !is_yearly {
        return PriceDisplay {
            price_text: format!("{}/month", format_money(plan.monthly_price_minor)),
            save_badge: None,
        };
    }

    let savings = compute_yearly_savings(plan);
    PriceDisplay {
        price_text: format!("{}/year", format_money(plan.yearly_price_minor)),
        save_badge: (savings.percent > 0).then(|| format!("Save {}%", savings.percent)),
    }
}

pub fn plan_selector_visible(status: SubscriptionStatus) -> bool {
    match status {
        SubscriptionStatus::Active | SubscriptionStatus::Cancelled => true,
        SubscriptionStatus::Inactive => false,
    }
}

pub fn plan_summary(plan: &PlanEntity) -> PlanSummary {
    PlanSummary {
        id: plan.id,
        name: plan.name.clone(),
        monthly_price: format_money(plan.monthly_price_minor),
        yearly_price: format_money(plan.yearly_price_minor),
        yearly_savings: compute_yearly_savings(plan),
    }
}

pub fn feature_comparison(features: &PlanFeatures) -> Vec<FeatureAvailability> {
    let flag = |key: &'static str, label: &'static str, included: bool| FeatureAvailability {
        key,
        label,
        included,
        limit: None,
    };
    let limit = |key: &'static str, label: &'static str, value: i32| FeatureAvailability {
        key,
        label,
        included: value > 0,
        limit: Some(value),
    };

    vec![
        flag("autoFarm", "Auto Farm", features.auto_farm),
        flag("trainer", "Troop Trainer", features.trainer),
        limit("maxVillages", "Max Villages", features.max_villages_or_default()),
        limit("maxTasks", "Max Concurrent Tasks", features.max_tasks_or_default()),
        flag("advanced", "Advanced Features", features.advanced),
        flag("notification", "Notifications", features.notification),
    ]
}

pub fn plan_action(current: Option<&PlanEntity>, candidate: &PlanEntity) -> PlanAction {
    match current {
        None => PlanAction::Subscribe,
        Some(current) if current.id == candidate.id => PlanAction::Current,
        Some(current) if candidate.monthly_price_minor > current.monthly_price_minor => {
            PlanAction::Upgrade
        }
        Some(_) => PlanAction::Downgrade,
    }
}

fn catalog_actions(current: Option<&PlanEntity>, catalog: &[PlanEntity]) -> Vec<PlanActionItem> {
    catalog
        .iter()
        .filter(|plan| plan.is_active)
        .map(|plan| PlanActionItem {
            plan_id: plan.id,
            plan_name: plan.name.clone(),
            action: plan_action(current, plan),
        })
        .collect()
}

pub fn plan_card(current: Option<&PlanEntity>, plan: &PlanEntity) -> PlanCard {
    PlanCard {
        plan: plan_summary(plan),
        features: feature_comparison(&plan.features),
        monthly: billing_toggle(false, plan),
        yearly: billing_toggle(true, plan),
        action: plan_action(current, plan),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn plan(name: &str, monthly: i64, yearly: i64) -> PlanEntity {
        PlanEntity {
            id: Uuid::new_v4(),
            name: name.to_string(),
            monthly_price_minor: monthly,
            yearly_price_minor: yearly,
            features: PlanFeatures {
                auto_farm: true,
                max_villages: Some(3),
                ..PlanFeatures::default()
            },
            is_active: true,
        }
    }

    fn record(status: &str, plan_id: Option<Uuid>, ends_at: DateTime<Utc>) -> SubscriptionEntity {
        let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        SubscriptionEntity {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            plan_id,
            status: status.to_string(),
            billing_period: "monthly".to_string(),
            starts_at: Some(created),
            ends_at: Some(ends_at),
            auto_renew: true,
            created_at: created,
            updated_at: created,
        }
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap()
    }

    #[test]
    fn savings_for_ten_monthly_ninety_six_yearly_is_twenty() {
        let savings = compute_yearly_savings(&plan("Basic", 1000, 9600));
        assert_eq!(savings.percent, 20);
        assert!(!savings.mispriced);
    }

    #[test]
    fn zero_monthly_price_is_flagged_not_divided() {
        let savings = compute_yearly_savings(&plan("Free", 0, 0));
        assert_eq!(savings.percent, 0);
        assert!(savings.mispriced);

        let overpriced = compute_yearly_savings(&plan("Odd", 1000, 13000));
        assert!(overpriced.percent < 0);
        assert!(overpriced.mispriced);
    }

    #[test]
    fn billing_toggle_switches_text_and_badge() {
        let basic = plan("Basic", 1000, 9600);

        let monthly = billing_toggle(false, &basic);
        assert_eq!(monthly.price_text, "$10.00/month");
        assert_eq!(monthly.save_badge, None);

        let yearly = billing_toggle(true, &basic);
        assert_eq!(yearly.price_text, "$96.00/year");
        assert_eq!(yearly.save_badge.as_deref(), Some("Save 20%"));

        let no_discount = billing_toggle(true, &plan("Flat", 1000, 12000));
        assert_eq!(no_discount.save_badge, None);
    }

    #[test]
    fn selector_hidden_only_for_inactive() {
        assert!(plan_selector_visible(SubscriptionStatus::Active));
        assert!(plan_selector_visible(SubscriptionStatus::Cancelled));
        assert!(!plan_selector_visible(SubscriptionStatus::Inactive));
    }

    #[test]
    fn cancelled_counts_down_and_stays_cancelled() {
        let basic = plan("Basic", 1000, 9600);
        let catalog = vec![basic.clone()];
        let cancelled = record("cancelled", Some(basic.id), at(2025, 6, 1));

        let before = project(Some(&cancelled), &catalog, at(2025, 5, 25));
        assert_eq!(before.status, SubscriptionStatus::Cancelled);
        assert_eq!(before.remaining_days, Some(7));
        assert_eq!(before.end_date, cancelled.ends_at);
        assert_eq!(before.plan_name, "Basic");

        let after = project(Some(&cancelled), &catalog, at(2025, 6, 2));
        assert_eq!(after.status, SubscriptionStatus::Cancelled);
        assert_eq!(after.remaining_days, Some(0));
    }

    #[test]
    fn active_lists_features_and_relative_actions() {
        let basic = plan("Basic", 1000, 9600);
        let premium = plan("Premium", 2500, 24000);
        let starter = plan("Starter", 500, 4800);
        let catalog = vec![starter.clone(), basic.clone(), premium.clone()];

        let view = project(
            Some(&record("active", Some(basic.id), at(2025, 7, 1))),
            &catalog,
            at(2025, 6, 1),
        );

        assert_eq!(view.status, SubscriptionStatus::Active);
        assert_eq!(view.next_payment, Some(at(2025, 7, 1)));
        assert_eq!(view.billing_period, Some(BillingPeriod::Monthly));
        assert_eq!(view.features.len(), 6);
        assert_eq!(view.features[0].key, "autoFarm");
        assert_eq!(view.features[2].limit, Some(3));

        let actions: Vec<PlanAction> = view.actions.iter().map(|item| item.action).collect();
        assert_eq!(
            actions,
            vec![PlanAction::Downgrade, PlanAction::Current, PlanAction::Upgrade]
        );
    }

    #[test]
    fn inactive_and_missing_render_the_same_call_to_action() {
        let catalog = vec![plan("Basic", 1000, 9600)];

        let none = project(None, &catalog, at(2025, 6, 1));
        let inactive = project(
            Some(&record("inactive", None, at(2025, 1, 1))),
            &catalog,
            at(2025, 6, 1),
        );

        assert_eq!(none, inactive);
        assert_eq!(none.call_to_action, Some(SELECT_PLAN_CALL_TO_ACTION));
        assert!(none.features.is_empty());
        assert!(none.actions.iter().all(|item| item.action == PlanAction::Subscribe));
    }

    #[test]
    fn unresolved_plan_degrades_to_placeholder_name() {
        let catalog = vec![plan("Basic", 1000, 9600)];
        let view = project(
            Some(&record("active", Some(Uuid::new_v4()), at(2025, 7, 1))),
            &catalog,
            at(2025, 6, 1),
        );

        assert_eq!(view.status, SubscriptionStatus::Active);
        assert_eq!(view.plan_name, NO_PLAN_NAME);
        assert!(view.plan.is_none());
        assert!(view.features.is_empty());
    }
}
