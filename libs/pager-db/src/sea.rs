//! SeaORM-backed data source: `Filter` → `sea_orm::Condition`, ordering via
//! `QueryOrder`, window via `offset`/`limit`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use pager_core::{Filter, SortDirection, Value};
use sea_orm::{
    sea_query::{Expr, Func, LikeExpr, Order},
    ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, IdenStatic, Iterable,
    PaginatorTrait, PrimaryKeyToColumn, QueryFilter, QueryOrder, QuerySelect, Select,
};

use crate::source::{OrderedQuery, QueryableSource};

/// Whitelist of API field names → entity columns. Names are case-insensitive.
pub struct ColumnMap<E: EntityTrait> {
    map: HashMap<String, E::Column>,
}

impl<E: EntityTrait> Clone for ColumnMap<E> {
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
        }
    }
}

impl<E: EntityTrait> Default for ColumnMap<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EntityTrait> ColumnMap<E> {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Expose every column of the entity under its column name.
    pub fn all_columns() -> Self {
        E::Column::iter().fold(Self::new(), |map, col| map.insert(col.as_str(), col))
    }

    pub fn insert(mut self, api_name: impl Into<String>, col: E::Column) -> Self {
        self.map.insert(api_name.into().to_lowercase(), col);
        self
    }

    pub fn get(&self, name: &str) -> Option<E::Column> {
        self.map.get(&name.trim().to_lowercase()).copied()
    }
}

/* ---------- value + LIKE helpers ---------- */

fn to_sea_value(v: &Value) -> sea_orm::Value {
    match v {
        Value::Null => sea_orm::Value::String(None),
        Value::Bool(b) => sea_orm::Value::Bool(Some(*b)),
        Value::Int(i) => sea_orm::Value::BigInt(Some(*i)),
        Value::Float(f) => sea_orm::Value::Double(Some(*f)),
        Value::Text(s) => sea_orm::Value::String(Some(Box::new(s.clone()))),
        Value::Uuid(u) => sea_orm::Value::Uuid(Some(Box::new(*u))),
        Value::DateTime(dt) => sea_orm::Value::ChronoDateTimeUtc(Some(Box::new(*dt))),
    }
}

fn like_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '%' | '_' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            c => out.push(c),
        }
    }
    out
}

fn like_contains(s: &str) -> LikeExpr {
    LikeExpr::new(format!("%{}%", like_escape(&s.to_lowercase()))).escape('\\')
}

/* ---------- Filter -> Condition ---------- */

/// Compile a resolved filter. `Contains` matches case-insensitively on every
/// backend (`LOWER(col) LIKE lower(pattern)`).
pub fn filter_to_condition<C>(filter: &Filter<C>) -> Condition
where
    C: ColumnTrait,
{
    match filter {
        Filter::All => Condition::all(),
        Filter::Eq(col, Value::Null) => Condition::all().add(Expr::col(*col).is_null()),
        Filter::Eq(col, v) => Condition::all().add(Expr::col(*col).eq(to_sea_value(v))),
        Filter::Contains(col, needle) => Condition::all()
            .add(Expr::expr(Func::lower(Expr::col(*col))).like(like_contains(needle))),
        Filter::And(parts) => parts
            .iter()
            .fold(Condition::all(), |acc, p| acc.add(filter_to_condition(p))),
        Filter::Or(parts) => parts
            .iter()
            .fold(Condition::any(), |acc, p| acc.add(filter_to_condition(p))),
        Filter::Not(inner) => Condition::all().not().add(filter_to_condition(inner)),
    }
}

fn sea_order(direction: SortDirection) -> Order {
    match direction {
        SortDirection::Ascending => Order::Asc,
        SortDirection::Descending => Order::Desc,
    }
}

/* ---------- source ---------- */

/// Source over one entity. Generic over `C: ConnectionTrait`, so it works with
/// a `DatabaseConnection` or a transaction.
pub struct SeaSource<E: EntityTrait, C> {
    conn: Arc<C>,
    columns: ColumnMap<E>,
}

impl<E: EntityTrait, C> SeaSource<E, C> {
    pub fn new(conn: Arc<C>, columns: ColumnMap<E>) -> Self {
        Self { conn, columns }
    }

    pub fn columns(&self) -> &ColumnMap<E> {
        &self.columns
    }
}

#[async_trait]
impl<E, C> QueryableSource for SeaSource<E, C>
where
    E: EntityTrait,
    E::Model: Sync,
    C: ConnectionTrait + Send + Sync + 'static,
{
    type Record = E::Model;
    type Key = E::Column;
    type Error = DbErr;
    type Query = SeaQuery<E, C>;

    fn resolve(&self, path: &str) -> Option<E::Column> {
        self.columns.get(path)
    }

    async fn count(&self, filter: &Filter<E::Column>) -> Result<u64, DbErr> {
        let select = E::find().filter(filter_to_condition(filter));
        select.count(self.conn.as_ref()).await
    }

    fn filter(&self, filter: &Filter<E::Column>) -> SeaQuery<E, C> {
        SeaQuery {
            select: E::find().filter(filter_to_condition(filter)),
            conn: self.conn.clone(),
            order: Vec::new(),
        }
    }
}

pub struct SeaQuery<E: EntityTrait, C> {
    select: Select<E>,
    conn: Arc<C>,
    order: Vec<(E::Column, SortDirection)>,
}

#[async_trait]
impl<E, C> OrderedQuery for SeaQuery<E, C>
where
    E: EntityTrait,
    E::Model: Sync,
    C: ConnectionTrait + Send + Sync + 'static,
{
    type Record = E::Model;
    type Key = E::Column;
    type Error = DbErr;

    fn order_by(mut self, key: &E::Column, direction: SortDirection) -> Self {
        self.order.clear();
        self.order.push((*key, direction));
        self
    }

    fn then_by(mut self, key: &E::Column, direction: SortDirection) -> Self {
        self.order.push((*key, direction));
        self
    }

    /// Primary-key columns not already ordered on are appended ascending, so
    /// rows tied on every requested key still come back in a fixed order.
    async fn skip_take(self, skip: u64, take: u64) -> Result<Vec<E::Model>, DbErr> {
        let mut select = self.select;
        for (col, direction) in &self.order {
            select = select.order_by(*col, sea_order(*direction));
        }
        for pk in E::PrimaryKey::iter() {
            let col = pk.into_column();
            if !self.order.iter().any(|(c, _)| c.as_str() == col.as_str()) {
                select = select.order_by(col, Order::Asc);
            }
        }

        select
            .offset(skip)
            .limit(take)
            .all(self.conn.as_ref())
            .await
    }
}
