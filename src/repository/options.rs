use sea_orm::sea_query::Expr;
use sea_orm::{EntityTrait, JoinType, QueryFilter, QuerySelect, RelationDef, RelationTrait, Select, Value};

/// Generic select transform (ordering, limiting, locking hints, ...).
type Modifier<E> = Box<dyn Fn(Select<E>) -> Select<E> + Send + Sync>;

/// Deferred relation definition; `RelationDef` is consumed by a join, so
/// preloads are stored as producers and realized per query.
type Preload = Box<dyn Fn() -> RelationDef + Send + Sync>;

/// Composable description of what subset and shape of data a read returns,
/// independent of how the store executes it.
///
/// Four independent, optional parts: a condition in the store's native
/// predicate syntax with `?` placeholders, its positional arguments, generic
/// select modifiers, and relation preloads. Application order is fixed:
/// preloads, then modifiers, then the condition, so modifier-driven ordering
/// and limits always operate over the same predicate-qualified set.
///
/// Options are built once and never mutated afterwards; repositories take
/// them by shared reference.
///
/// ```ignore
/// let opts = QueryOptions::new()
///     .condition("title = ?", [title.into()])
///     .modifier(|s| s.order_by_desc(note::Column::CreatedAt))
///     .preload(note::Relation::User);
/// ```
pub struct QueryOptions<E: EntityTrait> {
    condition: Option<String>,
    args: Vec<Value>,
    modifiers: Vec<Modifier<E>>,
    preloads: Vec<Preload>,
}

impl<E: EntityTrait> Default for QueryOptions<E> {
    fn default() -> Self {
        Self {
            condition: None,
            args: Vec::new(),
            modifiers: Vec::new(),
            preloads: Vec::new(),
        }
    }
}

impl<E: EntityTrait> QueryOptions<E> {
    /// All-permissive options: no filtering, no modifiers, no preloads.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter predicate in the store's native syntax, with `?` placeholders
    /// bound positionally from `args`.
    pub fn condition(
        mut self,
        condition: impl Into<String>,
        args: impl IntoIterator<Item = Value>,
    ) -> Self {
        self.condition = Some(condition.into());
        self.args = args.into_iter().collect();
        self
    }

    /// Append a generic select modifier. Modifiers run in insertion order.
    pub fn modifier(mut self, f: impl Fn(Select<E>) -> Select<E> + Send + Sync + 'static) -> Self {
        self.modifiers.push(Box::new(f));
        self
    }

    /// Eagerly join the given relation. Declared relation values, not
    /// relation-name strings, so a typo is a compile error.
    pub fn preload<R>(mut self, relation: R) -> Self
    where
        R: RelationTrait + Copy + Send + Sync + 'static,
    {
        self.preloads.push(Box::new(move || relation.def()));
        self
    }

    /// A condition is usable only when present and non-empty.
    pub(crate) fn has_condition(&self) -> bool {
        self.condition.as_deref().is_some_and(|c| !c.is_empty())
    }

    pub(crate) fn apply_preloads(&self, mut select: Select<E>) -> Select<E> {
        for preload in &self.preloads {
            select = select.join(JoinType::LeftJoin, preload());
        }
        select
    }

    pub(crate) fn apply_modifiers(&self, mut select: Select<E>) -> Select<E> {
        for modifier in &self.modifiers {
            select = modifier(select);
        }
        select
    }

    pub(crate) fn apply_condition(&self, select: Select<E>) -> Select<E> {
        match self.condition.as_deref() {
            Some(condition) if !condition.is_empty() => {
                select.filter(Expr::cust_with_values(condition, self.args.iter().cloned()))
            }
            _ => select,
        }
    }
}
