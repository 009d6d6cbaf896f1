//! Import from a simple csv format logic.

#[cfg(all(test, feature = "csv-format"))]
#[path = "../../../tests/unit/extensions/import/csv_test.rs"]
mod csv_test;

pub use self::actual::read_csv_snapshot;

#[cfg(feature = "csv-format")]
mod actual {
    use rake_pragmatic::format::FormatError;
    use rake_pragmatic::format::snapshot::*;
    use rake_pragmatic::{format_time, parse_time};
    use serde::Deserialize;
    use std::collections::BTreeSet;
    use std::error::Error;
    use std::io::{BufReader, Read};

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    struct CsvOrder {
        id: String,
        plant: String,
        material: String,
        quantity: f64,
        destination: String,
        window_start: String,
        window_end: String,
        priority: Option<u8>,
        hard_deadline: Option<bool>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    struct CsvWagon {
        id: String,
        #[serde(rename = "TYPE")]
        wagon_type: String,
        capacity: f64,
        location: String,
        status: Option<String>,
    }

    fn read_csv_entries<T, R: Read>(reader: BufReader<R>) -> Result<Vec<T>, Box<dyn Error>>
    where
        for<'de> T: Deserialize<'de>,
    {
        let mut reader = csv::Reader::from_reader(reader);
        let mut entries = vec![];

        for entry in reader.deserialize() {
            entries.push(entry?);
        }

        Ok(entries)
    }

    pub(super) fn read_orders<R: Read>(reader: BufReader<R>) -> Result<Vec<Order>, Box<dyn Error>> {
        let orders = read_csv_entries::<CsvOrder, _>(reader)?
            .into_iter()
            .map(|order| Order {
                id: order.id,
                plant: order.plant,
                material: order.material,
                quantity: order.quantity,
                destination: order.destination,
                window: vec![order.window_start, order.window_end],
                priority: order.priority.unwrap_or_default(),
                wagon_types: vec![],
                hard_deadline: order.hard_deadline.unwrap_or_default(),
            })
            .collect();

        Ok(orders)
    }

    fn parse_status(status: Option<&str>) -> Result<WagonStatus, Box<dyn Error>> {
        match status.map(|status| status.trim().to_lowercase()).as_deref() {
            None | Some("") | Some("available") => Ok(WagonStatus::Available),
            Some("maintenance") | Some("inmaintenance") => Ok(WagonStatus::InMaintenance),
            Some("reserved") => Ok(WagonStatus::Reserved),
            Some(other) => Err(format!("unknown wagon status: '{other}'").into()),
        }
    }

    pub(super) fn read_wagons<R: Read>(reader: BufReader<R>) -> Result<Vec<Wagon>, Box<dyn Error>> {
        read_csv_entries::<CsvWagon, _>(reader)?
            .into_iter()
            .map(|wagon| -> Result<Wagon, Box<dyn Error>> {
                Ok(Wagon {
                    status: parse_status(wagon.status.as_deref())?,
                    id: wagon.id,
                    wagon_type: wagon.wagon_type,
                    capacity: wagon.capacity,
                    location: wagon.location,
                    availability: None,
                    profile: None,
                })
            })
            .collect()
    }

    fn get_start_time(orders: &[Order]) -> Result<String, Box<dyn Error>> {
        let earliest = orders.iter().filter_map(|order| order.window.first()).try_fold(None, |earliest, time| {
            let time = parse_time(time)?;
            Ok::<_, Box<dyn Error>>(Some(earliest.map_or(time, |earliest: f64| earliest.min(time))))
        })?;

        Ok(format_time(earliest.unwrap_or_default()))
    }

    fn create_materials(orders: &[Order], wagons: &[Wagon]) -> Vec<Material> {
        let wagon_types = wagons.iter().map(|wagon| wagon.wagon_type.clone()).collect::<BTreeSet<_>>();

        orders
            .iter()
            .map(|order| order.material.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(|id| Material {
                id,
                wagon_types: wagon_types.iter().cloned().collect(),
                splittable: true,
                handling_modes: vec![],
            })
            .collect()
    }

    fn create_format_error(entity: &str, error: Box<dyn Error>) -> FormatError {
        FormatError::new_with_details(
            "E0000".to_string(),
            format!("cannot read {entity}"),
            format!("check {entity} definition"),
            format!("{error}"),
        )
    }

    /// Reads snapshot skeleton from csv exports of orders and wagons. Loading points and routes are
    /// left empty, materials allow every imported wagon type.
    pub fn read_csv_snapshot<R1: Read, R2: Read>(
        orders_reader: BufReader<R1>,
        wagons_reader: BufReader<R2>,
    ) -> Result<Snapshot, FormatError> {
        let orders = read_orders(orders_reader).map_err(|err| create_format_error("orders", err))?;
        let wagons = read_wagons(wagons_reader).map_err(|err| create_format_error("wagons", err))?;
        let start_time = get_start_time(orders.as_slice()).map_err(|err| create_format_error("orders", err))?;
        let materials = create_materials(orders.as_slice(), wagons.as_slice());

        Ok(Snapshot { start_time, version: 0, orders, wagons, loading_points: vec![], routes: vec![], materials })
    }
}

#[cfg(not(feature = "csv-format"))]
mod actual {
    use rake_pragmatic::format::FormatError;
    use rake_pragmatic::format::snapshot::Snapshot;
    use std::io::{BufReader, Read};

    /// A stub method for reading snapshot from csv format.
    pub fn read_csv_snapshot<R1: Read, R2: Read>(
        _orders_reader: BufReader<R1>,
        _wagons_reader: BufReader<R2>,
    ) -> Result<Snapshot, FormatError> {
        unreachable!("csv-format feature is not included")
    }
}
