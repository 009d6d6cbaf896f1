use super::actual::{read_orders, read_wagons};
use super::*;
use rake_pragmatic::format::snapshot::WagonStatus;
use std::io::BufReader;

const ORDERS_CSV: &str = r"
ID,PLANT,MATERIAL,QUANTITY,DESTINATION,WINDOW_START,WINDOW_END,PRIORITY,HARD_DEADLINE
o1,plant1,coal,50,city1,2024-01-02T00:00:00Z,2024-01-03T00:00:00Z,1,
o2,plant1,coal,30,city1,2024-01-01T12:00:00Z,2024-01-03T00:00:00Z,,true
";

const WAGONS_CSV: &str = r"
ID,TYPE,CAPACITY,LOCATION,STATUS
w1,BOXN,60,plant1,available
w2,BCN,55,plant1,
w3,BOXN,60,plant1,reserved
";

#[test]
fn can_read_orders() {
    let orders = read_orders(BufReader::new(ORDERS_CSV.as_bytes())).unwrap();

    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].window, vec!["2024-01-02T00:00:00Z".to_string(), "2024-01-03T00:00:00Z".to_string()]);
    assert_eq!(orders[0].priority, 1);
    assert!(!orders[0].hard_deadline);
    assert_eq!(orders[1].priority, 0);
    assert!(orders[1].hard_deadline);
}

#[test]
fn can_read_wagons() {
    let wagons = read_wagons(BufReader::new(WAGONS_CSV.as_bytes())).unwrap();

    let statuses = wagons.iter().map(|wagon| wagon.status).collect::<Vec<_>>();
    assert_eq!(statuses, vec![WagonStatus::Available, WagonStatus::Available, WagonStatus::Reserved]);
    assert_eq!(wagons[1].wagon_type, "BCN");
    assert_eq!(wagons[1].capacity, 55.);
}

#[test]
fn can_read_snapshot_skeleton() {
    let snapshot =
        read_csv_snapshot(BufReader::new(ORDERS_CSV.as_bytes()), BufReader::new(WAGONS_CSV.as_bytes())).unwrap();

    assert_eq!(snapshot.start_time, "2024-01-01T12:00:00Z");
    assert_eq!(snapshot.orders.len(), 2);
    assert_eq!(snapshot.wagons.len(), 3);
    assert_eq!(snapshot.materials.len(), 1);
    assert_eq!(snapshot.materials[0].id, "coal");
    assert_eq!(snapshot.materials[0].wagon_types, vec!["BCN".to_string(), "BOXN".to_string()]);
    assert!(snapshot.loading_points.is_empty());
    assert!(snapshot.routes.is_empty());
}

#[test]
fn can_propagate_format_error() {
    let invalid_orders = r"
ID,PLANT,MATERIAL,QUANTITY,DESTINATION,WINDOW_START,WINDOW_END
o1,plant1,coal,fifty,city1,2024-01-02T00:00:00Z,2024-01-03T00:00:00Z
";

    let result = read_csv_snapshot(BufReader::new(invalid_orders.as_bytes()), BufReader::new("".as_bytes()))
        .err()
        .expect("Should return error!");

    assert_eq!(result.code, "E0000");
    assert_eq!(result.cause, "cannot read orders");
    assert_eq!(result.action, "check orders definition");
    assert!(result.details.is_some())
}

#[test]
fn can_reject_unknown_wagon_status() {
    let wagons = r"
ID,TYPE,CAPACITY,LOCATION,STATUS
w1,BOXN,60,plant1,broken
";

    let result = read_csv_snapshot(BufReader::new(ORDERS_CSV.as_bytes()), BufReader::new(wagons.as_bytes()))
        .err()
        .expect("Should return error!");

    assert_eq!(result.cause, "cannot read wagons");
    assert_eq!(result.details, Some("unknown wagon status: 'broken'".to_string()));
}

#[test]
fn can_use_epoch_start_without_orders() {
    let orders = "ID,PLANT,MATERIAL,QUANTITY,DESTINATION,WINDOW_START,WINDOW_END\n";

    let snapshot =
        read_csv_snapshot(BufReader::new(orders.as_bytes()), BufReader::new(WAGONS_CSV.as_bytes())).unwrap();

    assert_eq!(snapshot.start_time, "1970-01-01T00:00:00Z");
    assert!(snapshot.materials.is_empty());
}
