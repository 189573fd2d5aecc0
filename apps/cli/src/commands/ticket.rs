//! # Ticket Commands
//!
//! ```text
//! ticket create
//!      │
//!      ├── require tickets.create
//!      ├── resolve --item lines against the catalog
//!      ├── validate the draft ──── invalid ──► VALIDATION_ERROR (no number used)
//!      ├── next number from the local counter
//!      └── save through the fallback store
//! ```

use chrono::{NaiveDate, NaiveDateTime};
use ohana_core::catalog::suggested_item;
use ohana_core::search::{search_tickets, SearchField};
use ohana_core::{
    ClientVisits, DryCleaningItem, LaundryOptions, Money, Permission, Ticket, TicketDraft, TimeFrame,
    ValidationError,
};
use ohana_db::TicketStore;
use tracing::{debug, info};

use crate::cli::{ItemSpec, TicketCreateArgs};
use crate::error::CliResult;
use crate::state::AppState;

pub async fn create(state: &AppState, args: TicketCreateArgs, now: NaiveDateTime) -> CliResult<Ticket> {
    let user = state.require(Permission::TicketsCreate)?;

    let dry_cleaning_items = args
        .items
        .iter()
        .map(resolve_item)
        .collect::<Result<Vec<_>, _>>()?;

    let draft = TicketDraft {
        customer_name: args.name,
        customer_phone: args.phone,
        valet_quantity: args.valets,
        laundry_options: LaundryOptions::from_enabled(args.options),
        payment_method: args.payment,
        dry_cleaning_items,
    };
    // Rejected drafts must not consume a number
    draft.validate()?;

    let number = state.local().next_ticket_number()?;
    let ticket = draft.into_ticket(number, state.config().valet_price(), now)?;
    state.store().save_ticket(&ticket).await?;

    info!(
        ticket_number = %ticket.ticket_number,
        total = %ticket.total(),
        created_by = %user.username,
        "Ticket created"
    );
    Ok(ticket)
}

/// A catalog line at its base price, or a custom line when a price is given.
fn resolve_item(spec: &ItemSpec) -> Result<DryCleaningItem, ValidationError> {
    match spec.price {
        Some(price) => Ok(DryCleaningItem::new(spec.name.trim(), price, spec.quantity)),
        None => suggested_item(&spec.name, spec.quantity).ok_or_else(|| ValidationError::InvalidFormat {
            field: "item".to_string(),
            reason: format!("'{}' is not in the catalog, give a price as NAME:QTY:PRICE", spec.name),
        }),
    }
}

/// Every ticket, or those in the `timeframe` window around `date`.
pub async fn list(
    state: &AppState,
    timeframe: TimeFrame,
    date: Option<NaiveDate>,
    limit: Option<usize>,
) -> CliResult<Vec<Ticket>> {
    state.require(Permission::TicketsView)?;

    let mut tickets = match date {
        Some(date) => state.store().tickets_between(timeframe.range(date)).await?,
        None => state.store().list_tickets().await?,
    };
    if let Some(limit) = limit {
        tickets.truncate(limit);
    }
    Ok(tickets)
}

pub async fn search(state: &AppState, term: &str, field: SearchField) -> CliResult<Vec<Ticket>> {
    state.require(Permission::OrdersView)?;
    debug!(term = %term, ?field, "search command");

    let tickets = state.store().list_tickets().await?;
    Ok(search_tickets(&tickets, term, field))
}

pub async fn visits(state: &AppState, phone: &str) -> CliResult<ClientVisits> {
    state.require(Permission::TicketsView)?;
    Ok(state.store().client_visits(phone.trim()).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::{local_state, local_state_with, login, may15};
    use crate::error::ErrorCode;
    use ohana_core::{LaundryOption, PaymentMethod};

    fn args(name: &str, phone: &str, valets: i64) -> TicketCreateArgs {
        TicketCreateArgs {
            name: name.to_string(),
            phone: phone.to_string(),
            valets,
            payment: Some(PaymentMethod::Cash),
            options: vec![LaundryOption::NoDry],
            items: vec![],
        }
    }

    #[tokio::test]
    async fn test_create_numbers_and_prices() {
        let (_dir, state) = local_state();
        login(&state, "staff1");

        let mut first = args("María Gómez", "1144441234", 2);
        first.items = vec![
            ItemSpec { name: "saco".to_string(), quantity: 1, price: None },
            ItemSpec { name: "Cortina".to_string(), quantity: 2, price: Some(Money::from_pesos(7_000)) },
        ];
        let first = create(&state, first, may15(10)).await.unwrap();
        assert_eq!(first.ticket_number, "00000001");
        assert!(first.laundry_options.is_enabled(LaundryOption::NoDry));
        assert_eq!(first.dry_cleaning_items[0].name, "Saco");
        assert_eq!(first.dry_cleaning_items[1].line_total(), Money::from_pesos(14_000));
        assert_eq!(
            first.total(),
            Money::from_pesos(10_000) + first.dry_cleaning_items[0].price() + Money::from_pesos(14_000)
        );

        let second = create(&state, args("Jorge", "1155550001", 1), may15(11)).await.unwrap();
        assert_eq!(second.ticket_number, "00000002");
        assert_eq!(second.total(), Money::from_pesos(5_000));
    }

    #[tokio::test]
    async fn test_custom_price_keeps_centavos() {
        let (_dir, state) = local_state();
        login(&state, "staff1");

        let mut draft = args("Ana", "1144441234", 0);
        draft.items = vec!["Camisa:1:9.500,50".parse().unwrap()];
        let ticket = create(&state, draft, may15(10)).await.unwrap();
        assert_eq!(ticket.total(), Money::from_cents(950_050));
        assert_eq!(ticket.dry_cleaning_items[0].price(), Money::from_cents(950_050));
    }

    #[tokio::test]
    async fn test_invalid_draft_keeps_the_counter() {
        let (_dir, state) = local_state();
        login(&state, "staff1");

        let mut bad = args("Ana", "123", 1);
        bad.payment = None;
        let err = create(&state, bad, may15(10)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let mut unknown = args("Ana", "1144441234", 0);
        unknown.items = vec![ItemSpec { name: "Sombrero".to_string(), quantity: 1, price: None }];
        let err = create(&state, unknown, may15(10)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let mut huge = args("Ana", "1144441234", 0);
        huge.items = vec!["Alfombra:999:100.000.000.000.000".parse().unwrap()];
        let err = create(&state, huge, may15(10)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert_eq!(state.local().last_ticket_number().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_valet_price_comes_from_config() {
        let (_dir, state) = local_state_with(|config| {
            config.pricing.valet_price_cents = Money::from_pesos(6_000).cents();
        });
        login(&state, "staff1");

        let ticket = create(&state, args("Ana", "1144441234", 2), may15(9)).await.unwrap();
        assert_eq!(ticket.total(), Money::from_pesos(12_000));
    }

    #[tokio::test]
    async fn test_lookups_need_the_right_permission() {
        let (_dir, state) = local_state();
        login(&state, "staff1");
        create(&state, args("María Gómez", "1144441234", 1), may15(10)).await.unwrap();
        create(&state, args("Jorge Pérez", "1155550001", 1), may15(12)).await.unwrap();

        let listed = list(&state, TimeFrame::Daily, Some(may15(0).date()), None).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].customer_name, "Jorge Pérez");
        assert_eq!(list(&state, TimeFrame::Daily, None, Some(1)).await.unwrap().len(), 1);

        let visits = visits(&state, " 1144441234 ").await.unwrap();
        assert_eq!(visits.visit_count, 1);

        // staff starts without orders.view
        let err = search(&state, "gómez", SearchField::Any).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);

        login(&state, "admin1");
        let found = search(&state, "GÓMEZ", SearchField::Name).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].ticket_number, "00000001");
    }

    #[tokio::test]
    async fn test_requires_a_session() {
        let (_dir, state) = local_state();
        let err = create(&state, args("Ana", "1144441234", 1), may15(10)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthenticated);
    }
}
