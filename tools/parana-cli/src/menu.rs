//! The interactive shopper menu.
//!
//! Every recoverable error is reported here and control returns to the
//! menu with the basket untouched; only I/O failures and storage errors
//! outside the known taxonomy propagate out.

use anyhow::Result;
use dialoguer::{Confirm, Input, Select};

use parana_commerce::basket::BasketView;
use parana_commerce::catalog::{pick, Choice};
use parana_commerce::checkout::{CheckoutFlow, CheckoutState};
use parana_commerce::{CategoryId, ProductId, SellerId};
use parana_store::{Session, Store};

use crate::output::Output;

const MENU: &[&str] = &[
    "Display your order history",
    "Add an item to your basket",
    "View your basket",
    "Change the quantity of an item in your basket",
    "Remove an item from your basket",
    "Checkout",
    "Exit",
];

const BASKET_WIDTHS: &[usize] = &[32, 20, 5, 10, 10];
const HISTORY_WIDTHS: &[usize] = &[6, 10, 32, 20, 10, 5, 8];

/// Run the menu loop until the shopper exits.
pub fn run(store: &mut Store, session: &mut Session, output: &Output) -> Result<()> {
    loop {
        println!();
        let choice = Select::new()
            .with_prompt("PARANA - shopper main menu")
            .items(MENU)
            .default(0)
            .interact()?;

        match choice {
            0 => show_history(store, session, output)?,
            1 => add_item(store, session, output)?,
            2 => view_basket(store, session, output)?,
            3 => change_quantity(store, session, output)?,
            4 => remove_item(store, session, output)?,
            5 => checkout(store, session, output)?,
            _ => {
                output.info("Goodbye!");
                return Ok(());
            }
        }
    }
}

/// Numbered picker over an ordered choice list.
fn select<I: Copy>(prompt: &str, choices: &[Choice<I>]) -> Result<Option<I>> {
    let labels: Vec<&str> = choices.iter().map(|c| c.label.as_str()).collect();
    let position = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact()?
        + 1;
    Ok(pick(choices, position))
}

fn show_history(store: &Store, session: &Session, output: &Output) -> Result<()> {
    let history = store.history(session.shopper.id)?;
    if history.is_empty() {
        output.info("No orders placed yet.");
        return Ok(());
    }

    output.header("Order history");
    output.table_row(
        &["Order", "Date", "Product", "Seller", "Price", "Qty", "Status"],
        HISTORY_WIDTHS,
    );
    for row in &history {
        let order_id = row.order_id.to_string();
        let date = row.order_date.to_string();
        let price = row.price.to_string();
        let quantity = row.quantity.to_string();
        output.table_row(
            &[
                order_id.as_str(),
                date.as_str(),
                row.product.as_str(),
                row.seller.as_str(),
                price.as_str(),
                quantity.as_str(),
                row.status.as_str(),
            ],
            HISTORY_WIDTHS,
        );
    }
    Ok(())
}

fn add_item(store: &Store, session: &mut Session, output: &Output) -> Result<()> {
    let categories = store.categories()?;
    if categories.is_empty() {
        output.warn("The catalog has no categories.");
        return Ok(());
    }
    let choices: Vec<Choice<CategoryId>> = categories
        .iter()
        .map(|c| Choice::new(c.id, c.description.clone()))
        .collect();
    let Some(category) = select("Choose a category", &choices)? else {
        return Ok(());
    };

    let products = store.available_products(category)?;
    if products.is_empty() {
        output.info("No available products in this category.");
        return Ok(());
    }
    let choices: Vec<Choice<ProductId>> = products
        .iter()
        .map(|p| Choice::new(p.id, p.description.clone()))
        .collect();
    let Some(product) = select("Choose a product", &choices)? else {
        return Ok(());
    };

    let offers = store.seller_offers(product)?;
    if offers.is_empty() {
        output.info("No sellers currently offer this product.");
        return Ok(());
    }
    let choices: Vec<Choice<SellerId>> = offers
        .iter()
        .map(|o| Choice::new(o.seller_id, format!("{} - {}", o.seller_name, o.price)))
        .collect();
    let Some(seller) = select("Choose a seller", &choices)? else {
        return Ok(());
    };

    let quantity: i64 = Input::new().with_prompt("Quantity").interact_text()?;

    match store.add_item(session.basket(), session.shopper.id, product, seller, quantity) {
        Ok(basket) => {
            session.set_basket(basket);
            output.success("Item added to your basket.");
        }
        Err(e) if e.is_recoverable() => output.error(&e.to_string()),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn view_basket(store: &Store, session: &Session, output: &Output) -> Result<()> {
    let view = store.items(session.basket())?;
    if view.is_empty() {
        output.info("Your basket is empty.");
        return Ok(());
    }
    render_basket(output, &view)
}

fn render_basket(output: &Output, view: &BasketView) -> Result<()> {
    output.header("Your basket");
    output.table_row(&["Product", "Seller", "Qty", "Price", "Total"], BASKET_WIDTHS);
    for item in &view.items {
        let quantity = item.quantity.to_string();
        let unit_price = item.unit_price.to_string();
        let line_total = item.line_total.to_string();
        output.table_row(
            &[
                item.product.as_str(),
                item.seller.as_str(),
                quantity.as_str(),
                unit_price.as_str(),
                line_total.as_str(),
            ],
            BASKET_WIDTHS,
        );
    }
    let total = view.total()?.to_string();
    output.table_row(&["", "", "", "Basket total", total.as_str()], BASKET_WIDTHS);
    Ok(())
}

/// Pick one line out of the basket view.
fn select_line(view: &BasketView) -> Result<Option<(ProductId, SellerId)>> {
    let choices: Vec<Choice<(ProductId, SellerId)>> = view
        .items
        .iter()
        .map(|i| {
            Choice::new(
                (i.product_id, i.seller_id),
                format!("{} from {} (qty {})", i.product, i.seller, i.quantity),
            )
        })
        .collect();
    select("Choose an item", &choices)
}

fn change_quantity(store: &Store, session: &mut Session, output: &Output) -> Result<()> {
    let view = store.items(session.basket())?;
    let Some(basket) = session.basket() else {
        output.info("Your basket is empty.");
        return Ok(());
    };
    if view.is_empty() {
        output.info("Your basket is empty.");
        return Ok(());
    }

    let Some((product, seller)) = select_line(&view)? else {
        return Ok(());
    };
    let quantity: i64 = Input::new().with_prompt("New quantity").interact_text()?;

    match store.update_quantity(basket, product, seller, quantity) {
        Ok(()) => output.success("Quantity updated."),
        Err(e) if e.is_recoverable() => output.error(&e.to_string()),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn remove_item(store: &Store, session: &mut Session, output: &Output) -> Result<()> {
    let view = store.items(session.basket())?;
    let Some(basket) = session.basket() else {
        output.info("Your basket is empty.");
        return Ok(());
    };
    if view.is_empty() {
        output.info("Your basket is empty.");
        return Ok(());
    }

    let Some((product, seller)) = select_line(&view)? else {
        return Ok(());
    };

    // Removal is irreversible; it is gated behind explicit confirmation.
    let confirmed = Confirm::new()
        .with_prompt("Remove this item from your basket?")
        .default(false)
        .interact()?;
    if !confirmed {
        output.info("Nothing removed.");
        return Ok(());
    }

    match store.remove_item(basket, product, seller) {
        Ok(()) => {
            output.success("Item removed.");
            session.refresh(store)?;
        }
        Err(e) if e.is_recoverable() => output.error(&e.to_string()),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn checkout(store: &mut Store, session: &mut Session, output: &Output) -> Result<()> {
    let mut flow = CheckoutFlow::new();
    let snapshot = store.items(session.basket())?;

    if flow.show_preview(&snapshot)? == CheckoutState::Aborted {
        output.info("Your basket is empty; nothing to check out.");
        return Ok(());
    }
    let Some(basket) = session.basket() else {
        output.info("Your basket is empty; nothing to check out.");
        return Ok(());
    };

    render_basket(output, &snapshot)?;
    flow.request_confirmation()?;

    let confirmed = Confirm::new()
        .with_prompt("Place this order?")
        .default(false)
        .interact()?;
    if !confirmed {
        flow.decline()?;
        output.info("Checkout aborted; your basket is unchanged.");
        return Ok(());
    }

    match store.checkout(session.shopper.id, basket, &snapshot) {
        Ok(placed) => {
            flow.commit()?;
            session.clear_basket();
            output.success(&format!(
                "Order {} placed on {}: {} line(s), total {}.",
                placed.order.id,
                placed.order.order_date,
                placed.lines.len(),
                placed.total
            ));
        }
        Err(e) if e.is_recoverable() => {
            flow.abort();
            output.error(&e.to_string());
            output.warn("Your basket is unchanged; you can retry checkout.");
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
