use sea_orm::sea_query::{Alias, Expr, Func};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::plane;
use crate::entities::seat::{self, SeatClass, SeatStatus};
use crate::error::{AppError, AppResult};

/// Row-range rule for cabin class assignment.
pub fn seat_class_for_row(row: i32) -> SeatClass {
    if row <= 2 {
        SeatClass::FirstClass
    } else if row <= 5 {
        SeatClass::Business
    } else {
        SeatClass::Economy
    }
}

/// Column letters A, B, C, ... for a plane with `columns` seats per row.
pub fn column_letters(columns: i32) -> Vec<String> {
    (0..columns)
        .map(|i| char::from(b'A' + i as u8).to_string())
        .collect()
}

/// Build the full seat map for a plane: one seat per (row, column), all
/// available. Seats are only ever created through this path.
pub fn build_seat_map(plane: &plane::Model) -> Vec<seat::ActiveModel> {
    let letters = column_letters(plane.columns);
    let mut seats = Vec::with_capacity((plane.rows * plane.columns) as usize);

    for row in 1..=plane.rows {
        let class = seat_class_for_row(row);
        for letter in &letters {
            seats.push(seat::ActiveModel {
                id: Set(Uuid::new_v4()),
                plane_id: Set(plane.id),
                number: Set(format!("{}{}", row, letter)),
                row: Set(row),
                column: Set(letter.clone()),
                seat_class: Set(class),
                status: Set(SeatStatus::Available),
            });
        }
    }

    seats
}

/// Bulk-insert the generated seat map. Called inside the create-plane
/// transaction so a plane can never exist without its seats.
pub async fn generate_seats<C: ConnectionTrait>(conn: &C, plane: &plane::Model) -> AppResult<u64> {
    let seats = build_seat_map(plane);
    let count = seats.len() as u64;

    seat::Entity::insert_many(seats).exec(conn).await?;

    Ok(count)
}

/// Atomically transition a seat from available to taken. The conditional
/// update is the availability check: zero rows affected means the seat is
/// already taken or does not exist, which both surface as a conflict.
/// This is the only sanctioned mutation of seat status on the booking path.
pub async fn mark_taken<C: ConnectionTrait>(conn: &C, seat_id: Uuid) -> AppResult<()> {
    let result = seat::Entity::update_many()
        .col_expr(
            seat::Column::Status,
            Expr::value(SeatStatus::Taken).cast_as(Alias::new("seat_status")),
        )
        .filter(seat::Column::Id.eq(seat_id))
        .filter(seat::Column::Status.eq(SeatStatus::Available))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::Conflict("Seat is not available".to_string()));
    }

    Ok(())
}

/// Return a taken seat to available. Only reachable when the
/// `release_seat_on_cancel` config flag is enabled; idempotent.
pub async fn release<C: ConnectionTrait>(conn: &C, seat_id: Uuid) -> AppResult<()> {
    seat::Entity::update_many()
        .col_expr(
            seat::Column::Status,
            Expr::value(SeatStatus::Available).cast_as(Alias::new("seat_status")),
        )
        .filter(seat::Column::Id.eq(seat_id))
        .filter(seat::Column::Status.eq(SeatStatus::Taken))
        .exec(conn)
        .await?;

    Ok(())
}

/// Case-insensitive lookup of a seat by its human-readable number.
pub async fn find_by_plane_and_code<C: ConnectionTrait>(
    conn: &C,
    plane_id: Uuid,
    code: &str,
) -> AppResult<Option<seat::Model>> {
    let seat = seat::Entity::find()
        .filter(seat::Column::PlaneId.eq(plane_id))
        .filter(Expr::expr(Func::upper(Expr::col(seat::Column::Number))).eq(code.to_uppercase()))
        .one(conn)
        .await?;

    Ok(seat)
}

/// Available seats for a plane, in seat-map order.
pub async fn list_available<C: ConnectionTrait>(
    conn: &C,
    plane_id: Uuid,
) -> AppResult<Vec<seat::Model>> {
    let seats = seat::Entity::find()
        .filter(seat::Column::PlaneId.eq(plane_id))
        .filter(seat::Column::Status.eq(SeatStatus::Available))
        .order_by_asc(seat::Column::Row)
        .order_by_asc(seat::Column::Column)
        .all(conn)
        .await?;

    Ok(seats)
}

#[derive(Debug, Serialize)]
pub struct SeatCell {
    pub number: String,
    pub seat_class: SeatClass,
    pub status: SeatStatus,
}

/// Row-major seat map projection for rendering: one inner vector per row,
/// ordered by column. Read-only.
pub async fn layout<C: ConnectionTrait>(
    conn: &C,
    plane: &plane::Model,
) -> AppResult<Vec<Vec<SeatCell>>> {
    let seats = seat::Entity::find()
        .filter(seat::Column::PlaneId.eq(plane.id))
        .order_by_asc(seat::Column::Row)
        .order_by_asc(seat::Column::Column)
        .all(conn)
        .await?;

    let mut rows: Vec<Vec<SeatCell>> = (0..plane.rows).map(|_| Vec::new()).collect();
    for seat in seats {
        let idx = (seat.row - 1) as usize;
        if let Some(row) = rows.get_mut(idx) {
            row.push(SeatCell {
                number: seat.number,
                seat_class: seat.seat_class,
                status: seat.status,
            });
        }
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    use super::*;

    fn plane(rows: i32, columns: i32) -> plane::Model {
        plane::Model {
            id: Uuid::new_v4(),
            model: "Boeing 737".to_string(),
            capacity: 180,
            rows,
            columns,
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_class_rule_boundaries() {
        assert_eq!(seat_class_for_row(1), SeatClass::FirstClass);
        assert_eq!(seat_class_for_row(2), SeatClass::FirstClass);
        assert_eq!(seat_class_for_row(3), SeatClass::Business);
        assert_eq!(seat_class_for_row(5), SeatClass::Business);
        assert_eq!(seat_class_for_row(6), SeatClass::Economy);
        assert_eq!(seat_class_for_row(40), SeatClass::Economy);
    }

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letters(4), vec!["A", "B", "C", "D"]);
        assert_eq!(column_letters(1), vec!["A"]);
    }

    #[test]
    fn test_seat_map_generation() {
        let plane = plane(6, 4);
        let seats = build_seat_map(&plane);

        assert_eq!(seats.len(), 24);

        // all start available, numbers are row+letter
        for seat in &seats {
            assert_eq!(seat.status.clone().unwrap(), SeatStatus::Available);
        }
        assert_eq!(seats[0].number.clone().unwrap(), "1A");
        assert_eq!(seats[23].number.clone().unwrap(), "6D");

        // rows 1-2 first class, 3-5 business, 6 economy
        assert_eq!(seats[0].seat_class.clone().unwrap(), SeatClass::FirstClass);
        assert_eq!(seats[8].seat_class.clone().unwrap(), SeatClass::Business);
        assert_eq!(seats[20].seat_class.clone().unwrap(), SeatClass::Economy);
    }

    #[test]
    fn test_seat_map_unique_positions() {
        let plane = plane(10, 6);
        let seats = build_seat_map(&plane);

        let positions: std::collections::HashSet<(i32, String)> = seats
            .iter()
            .map(|s| {
                (
                    s.row.clone().unwrap(),
                    s.column.clone().unwrap(),
                )
            })
            .collect();

        assert_eq!(positions.len(), 60);
    }

    #[tokio::test]
    async fn test_mark_taken_succeeds_on_available_seat() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        assert!(mark_taken(&db, Uuid::new_v4()).await.is_ok());
    }

    #[tokio::test]
    async fn test_mark_taken_conflicts_when_no_row_updated() {
        // zero rows affected: seat is taken or missing
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let err = mark_taken(&db, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
