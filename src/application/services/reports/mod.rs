//! CSV report rendering. Pure functions over already-queried rows; handlers
//! attach the download headers.

use rust_decimal::Decimal;

use crate::domain::attendance::Headcount;
use crate::domain::giving::Contribution;
use crate::domain::members::Member;

fn finish(wtr: csv::Writer<Vec<u8>>) -> anyhow::Result<Vec<u8>> {
    wtr.into_inner()
        .map_err(|e| anyhow::anyhow!("csv flush: {e}"))
}

pub fn members_csv(members: &[Member]) -> anyhow::Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record([
        "first_name",
        "last_name",
        "email",
        "phone",
        "birthdate",
        "status",
        "joined_on",
    ])?;
    for m in members {
        wtr.write_record([
            m.first_name.as_str(),
            m.last_name.as_str(),
            m.email.as_deref().unwrap_or(""),
            m.phone.as_deref().unwrap_or(""),
            &m.birthdate.map(|d| d.to_string()).unwrap_or_default(),
            m.participation_status.as_str(),
            &m.joined_on.map(|d| d.to_string()).unwrap_or_default(),
        ])?;
    }
    finish(wtr)
}

/// One row per contribution, closed by a `TOTAL` row whose amount is the sum
/// of every row above it.
pub fn giving_csv(contributions: &[Contribution], total: Decimal) -> anyhow::Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["received_on", "member", "fund", "method", "amount", "note"])?;
    for c in contributions {
        wtr.write_record([
            &c.received_on.to_string(),
            c.member_name.as_str(),
            c.fund_name.as_str(),
            c.method.as_str(),
            &c.amount.to_string(),
            c.note.as_deref().unwrap_or(""),
        ])?;
    }
    wtr.write_record(["TOTAL", "", "", "", &total.to_string(), ""])?;
    finish(wtr)
}

pub fn attendance_csv(headcounts: &[Headcount]) -> anyhow::Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["date", "service", "headcount"])?;
    for h in headcounts {
        wtr.write_record([
            &h.attended_on.to_string(),
            h.service_name.as_str(),
            &h.count.to_string(),
        ])?;
    }
    finish(wtr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::giving::GivingMethod;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    #[test]
    fn giving_csv_ends_with_total_row() {
        let rows = vec![Contribution {
            id: Uuid::new_v4(),
            member_id: Uuid::new_v4(),
            member_name: "Ann Smith".into(),
            fund_id: Uuid::new_v4(),
            fund_name: "General Fund".into(),
            amount: dec!(25.00),
            received_on: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            method: GivingMethod::Check,
            note: None,
        }];
        let bytes = giving_csv(&rows, dec!(25.00)).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let last = text.trim_end().lines().last().unwrap();
        assert_eq!(last, "TOTAL,,,,25.00,");
        assert!(text.starts_with("received_on,member,fund,method,amount,note"));
    }

    #[test]
    fn attendance_csv_has_one_row_per_headcount() {
        let rows = vec![
            Headcount {
                attended_on: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
                service_name: "Sunday 9:00".into(),
                count: 120,
            },
            Headcount {
                attended_on: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
                service_name: "Sunday 11:00".into(),
                count: 95,
            },
        ];
        let bytes = attendance_csv(&rows).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.trim_end().lines().count(), 3);
    }
}
