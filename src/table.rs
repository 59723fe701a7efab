use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

use crate::model::{Currency, Flight};
use crate::query::SearchParams;

pub fn format_price(price: i64, currency: Currency) -> String {
    format!("{}{price}", currency.symbol())
}

pub fn render(flights: &[Flight]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Airline", "Flight", "Route", "Depart", "Arrive", "Duration", "Stops", "Price",
        ]);

    for flight in flights {
        let route = format!("{} → {}", flight.origin, flight.destination);

        let stops = if flight.stops == 0 {
            "Nonstop".to_string()
        } else {
            flight.stops.to_string()
        };

        let price = format_price(flight.price, flight.currency);

        table.add_row(vec![
            &flight.airline,
            &flight.flight_number,
            &route,
            &flight.depart_time,
            &flight.arrival_time,
            &flight.duration,
            &stops,
            &price,
        ]);
    }

    table.to_string()
}

pub fn render_recent(searches: &[SearchParams]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Route", "Depart", "Return", "Passengers", "Cabin"]);

    for search in searches {
        let route = format!("{} → {}", search.origin, search.destination);
        let ret = search.return_date.as_deref().unwrap_or("—");

        table.add_row(vec![
            &route,
            &search.depart_date,
            &ret.to_string(),
            &search.passengers.to_string(),
            &search.cabin_class.as_str().to_string(),
        ]);
    }

    table.to_string()
}
