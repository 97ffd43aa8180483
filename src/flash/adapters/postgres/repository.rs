//! `PostgreSQL` repository implementation for flash message storage.

use super::{
    models::{MessageRow, NewMessageRow, NewTagRow},
    schema::{flash_message_tags, flash_messages},
};
use crate::flash::{
    domain::{
        FlashMessage, Level, MessageId, MessageOrdering, MessageOwner, MessagePage, MessageQuery,
        MessageScope, OrderField, PageRequest, PersistedFlashMessage, ReadSelection, SessionKey,
        UnreadSummary, UserId,
    },
    ports::{FlashMessageRepository, FlashRepositoryError, FlashRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError, QueryResult};
use std::collections::HashMap;
use uuid::Uuid;

/// `PostgreSQL` connection pool type used by flash adapters.
pub type FlashPgPool = Pool<ConnectionManager<PgConnection>>;

type BoxedMessages = flash_messages::BoxedQuery<'static, Pg>;

/// `PostgreSQL`-backed flash message repository.
#[derive(Debug, Clone)]
pub struct PostgresFlashRepository {
    pool: FlashPgPool,
}

impl PostgresFlashRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: FlashPgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &FlashPgPool {
        &self.pool
    }

    async fn run_blocking<F, T>(&self, f: F) -> FlashRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> FlashRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(FlashRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(FlashRepositoryError::persistence)?
    }
}

#[async_trait]
impl FlashMessageRepository for PostgresFlashRepository {
    async fn store(&self, message: &FlashMessage) -> FlashRepositoryResult<()> {
        let message_id = message.id();
        let new_row = to_new_row(message);
        let tag_rows: Vec<NewTagRow> = message
            .tags()
            .iter()
            .map(|text| NewTagRow {
                message_id: message_id.into_inner(),
                text: text.clone(),
            })
            .collect();

        self.run_blocking(move |connection| {
            connection
                .transaction::<_, DieselError, _>(|tx| {
                    diesel::insert_into(flash_messages::table)
                        .values(&new_row)
                        .execute(tx)?;
                    if !tag_rows.is_empty() {
                        diesel::insert_into(flash_message_tags::table)
                            .values(&tag_rows)
                            .execute(tx)?;
                    }
                    Ok(())
                })
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        FlashRepositoryError::Duplicate(message_id)
                    }
                    _ => FlashRepositoryError::persistence(err),
                })
        })
        .await
    }

    async fn find(
        &self,
        scope: &MessageScope,
        id: MessageId,
    ) -> FlashRepositoryResult<Option<FlashMessage>> {
        let owned_scope = scope.clone();
        self.run_blocking(move |connection| {
            let row = scoped(&owned_scope)
                .filter(flash_messages::id.eq(id.into_inner()))
                .select(MessageRow::as_select())
                .first::<MessageRow>(connection)
                .optional()
                .map_err(FlashRepositoryError::persistence)?;
            let Some(found) = row else {
                return Ok(None);
            };
            let mut tags =
                load_tags(connection, &[found.id]).map_err(FlashRepositoryError::persistence)?;
            let row_tags = tags.remove(&found.id).unwrap_or_default();
            row_to_message(found, row_tags).map(Some)
        })
        .await
    }

    async fn list(
        &self,
        scope: &MessageScope,
        query: &MessageQuery,
        page: Option<PageRequest>,
    ) -> FlashRepositoryResult<MessagePage> {
        let owned_scope = scope.clone();
        let owned_query = query.clone();
        self.run_blocking(move |connection| {
            list_rows(connection, &owned_scope, &owned_query, page)
        })
        .await
    }

    async fn count_unread(&self, scope: &MessageScope) -> FlashRepositoryResult<u64> {
        let owned_scope = scope.clone();
        self.run_blocking(move |connection| {
            let count = scoped(&owned_scope)
                .filter(flash_messages::read_at.is_null())
                .count()
                .get_result::<i64>(connection)
                .map_err(FlashRepositoryError::persistence)?;
            to_count(count)
        })
        .await
    }

    async fn contains_unread(
        &self,
        scope: &MessageScope,
        text: &str,
        level: Level,
    ) -> FlashRepositoryResult<bool> {
        let owned_scope = scope.clone();
        let needle = text.to_owned();
        self.run_blocking(move |connection| {
            let found = scoped(&owned_scope)
                .filter(flash_messages::read_at.is_null())
                .filter(flash_messages::message.eq(needle))
                .filter(flash_messages::level.eq(level.value()))
                .select(flash_messages::id)
                .first::<Uuid>(connection)
                .optional()
                .map_err(FlashRepositoryError::persistence)?;
            Ok(found.is_some())
        })
        .await
    }

    async fn mark_read(
        &self,
        scope: &MessageScope,
        selection: &ReadSelection,
        at: DateTime<Utc>,
    ) -> FlashRepositoryResult<u64> {
        let owned_scope = scope.clone();
        let owned_selection = selection.clone();
        self.run_blocking(move |connection| {
            connection
                .transaction::<_, DieselError, _>(|tx| {
                    let mut statement =
                        scoped(&owned_scope).filter(flash_messages::read_at.is_null());
                    if let ReadSelection::Only(ids) = &owned_selection {
                        statement = statement.filter(flash_messages::id.eq_any(uuids(ids)));
                    }
                    let targets = statement.select(flash_messages::id).load::<Uuid>(tx)?;
                    if targets.is_empty() {
                        return Ok(0);
                    }
                    diesel::update(
                        flash_messages::table
                            .filter(flash_messages::id.eq_any(targets))
                            .filter(flash_messages::read_at.is_null()),
                    )
                    .set(flash_messages::read_at.eq(Some(at)))
                    .execute(tx)
                })
                .map(|updated| updated as u64)
                .map_err(FlashRepositoryError::persistence)
        })
        .await
    }

    async fn delete(&self, scope: &MessageScope, id: MessageId) -> FlashRepositoryResult<bool> {
        let owned_scope = scope.clone();
        self.run_blocking(move |connection| {
            let found = scoped(&owned_scope)
                .filter(flash_messages::id.eq(id.into_inner()))
                .select(flash_messages::id)
                .first::<Uuid>(connection)
                .optional()
                .map_err(FlashRepositoryError::persistence)?;
            let Some(target) = found else {
                return Ok(false);
            };
            diesel::delete(flash_messages::table.filter(flash_messages::id.eq(target)))
                .execute(connection)
                .map_err(FlashRepositoryError::persistence)?;
            Ok(true)
        })
        .await
    }

    async fn delete_read(&self, scope: &MessageScope) -> FlashRepositoryResult<u64> {
        let owned_scope = scope.clone();
        self.run_blocking(move |connection| {
            connection
                .transaction::<_, DieselError, _>(|tx| {
                    let targets = scoped(&owned_scope)
                        .filter(flash_messages::read_at.is_not_null())
                        .select(flash_messages::id)
                        .load::<Uuid>(tx)?;
                    if targets.is_empty() {
                        return Ok(0);
                    }
                    diesel::delete(
                        flash_messages::table.filter(flash_messages::id.eq_any(targets)),
                    )
                    .execute(tx)
                })
                .map(|deleted| deleted as u64)
                .map_err(FlashRepositoryError::persistence)
        })
        .await
    }

    async fn summarize_unread(&self, scope: &MessageScope) -> FlashRepositoryResult<UnreadSummary> {
        let owned_scope = scope.clone();
        self.run_blocking(move |connection| {
            let count = scoped(&owned_scope)
                .filter(flash_messages::read_at.is_null())
                .count()
                .get_result::<i64>(connection)
                .map_err(FlashRepositoryError::persistence)?;
            let max_level = scoped(&owned_scope)
                .filter(flash_messages::read_at.is_null())
                .select(diesel::dsl::max(flash_messages::level))
                .get_result::<Option<i32>>(connection)
                .map_err(FlashRepositoryError::persistence)?;
            Ok(UnreadSummary {
                count: to_count(count)?,
                max_level: max_level.map(Level::from_value),
            })
        })
        .await
    }

    async fn purge_session(&self, session_key: &SessionKey) -> FlashRepositoryResult<u64> {
        let key = session_key.as_str().to_owned();
        self.run_blocking(move |connection| {
            diesel::delete(flash_messages::table.filter(flash_messages::session_key.eq(key)))
                .execute(connection)
                .map(|deleted| deleted as u64)
                .map_err(FlashRepositoryError::persistence)
        })
        .await
    }

    async fn purge_user(&self, user: UserId) -> FlashRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            diesel::delete(
                flash_messages::table.filter(flash_messages::user_id.eq(user.into_inner())),
            )
            .execute(connection)
            .map(|deleted| deleted as u64)
            .map_err(FlashRepositoryError::persistence)
        })
        .await
    }
}

/// Base query restricted to the rows visible under `scope`.
fn scoped(scope: &MessageScope) -> BoxedMessages {
    let statement = flash_messages::table.into_boxed();
    match scope {
        MessageScope::User(user) => {
            statement.filter(flash_messages::user_id.eq(user.into_inner()))
        }
        MessageScope::Session { session_key, user } => {
            let by_user = match user {
                Some(owner) => statement.filter(flash_messages::user_id.eq(owner.into_inner())),
                None => statement.filter(flash_messages::user_id.is_null()),
            };
            by_user.filter(
                flash_messages::session_key
                    .eq(session_key.as_str().to_owned())
                    .or(flash_messages::session_key.is_null()),
            )
        }
    }
}

fn filtered(scope: &MessageScope, query: &MessageQuery) -> BoxedMessages {
    let mut statement = scoped(scope);

    statement = match query.unread {
        Some(true) => statement.filter(flash_messages::read_at.is_null()),
        Some(false) => statement.filter(flash_messages::read_at.is_not_null()),
        None => statement,
    };
    if let Some(tag) = &query.extra_tag {
        let tagged = flash_message_tags::table
            .filter(flash_message_tags::text.eq(tag.clone()))
            .select(flash_message_tags::message_id);
        statement = statement.filter(flash_messages::id.eq_any(tagged));
    }
    if let Some(level) = query.level {
        statement = statement.filter(flash_messages::level.eq(level.value()));
    }
    if let Some(level) = query.min_level {
        statement = statement.filter(flash_messages::level.ge(level.value()));
    }
    if let Some(view) = &query.view {
        statement = statement.filter(flash_messages::view.eq(view.clone()));
    }
    if let Some(after) = query.read.after {
        statement = statement.filter(flash_messages::read_at.ge(after));
    }
    if let Some(before) = query.read.before {
        statement = statement.filter(flash_messages::read_at.le(before));
    }
    if let Some(after) = query.created.after {
        statement = statement.filter(flash_messages::created_at.ge(after));
    }
    if let Some(before) = query.created.before {
        statement = statement.filter(flash_messages::created_at.le(before));
    }
    if let Some(needle) = &query.search {
        statement = statement.filter(flash_messages::message.ilike(like_pattern(needle)));
    }
    statement
}

fn ordered(statement: BoxedMessages, ordering: MessageOrdering) -> BoxedMessages {
    let primary = match ordering {
        MessageOrdering::UnreadFirst => statement.order(flash_messages::read_at.is_null().desc()),
        MessageOrdering::By { field, descending } => match (field, descending) {
            (OrderField::Level, false) => statement.order(flash_messages::level.asc()),
            (OrderField::Level, true) => statement.order(flash_messages::level.desc()),
            (OrderField::ReadAt, false) => statement.order(flash_messages::read_at.asc()),
            (OrderField::ReadAt, true) => statement.order(flash_messages::read_at.desc()),
            (OrderField::Created, false) => statement.order(flash_messages::created_at.asc()),
            (OrderField::Created, true) => statement.order(flash_messages::created_at.desc()),
        },
    };
    primary
        .then_order_by(flash_messages::created_at.desc())
        .then_order_by(flash_messages::id.desc())
}

fn list_rows(
    connection: &mut PgConnection,
    scope: &MessageScope,
    query: &MessageQuery,
    page: Option<PageRequest>,
) -> FlashRepositoryResult<MessagePage> {
    let total = filtered(scope, query)
        .count()
        .get_result::<i64>(connection)
        .map_err(FlashRepositoryError::persistence)?;

    let mut statement = ordered(filtered(scope, query), query.ordering);
    if let Some(request) = page {
        let offset = i64::try_from(request.offset()).map_err(FlashRepositoryError::persistence)?;
        statement = statement.limit(i64::from(request.size())).offset(offset);
    }
    let rows = statement
        .select(MessageRow::as_select())
        .load::<MessageRow>(connection)
        .map_err(FlashRepositoryError::persistence)?;

    let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
    let mut tags = load_tags(connection, &ids).map_err(FlashRepositoryError::persistence)?;
    let items = rows
        .into_iter()
        .map(|row| {
            let row_tags = tags.remove(&row.id).unwrap_or_default();
            row_to_message(row, row_tags)
        })
        .collect::<FlashRepositoryResult<Vec<_>>>()?;

    Ok(MessagePage {
        items,
        total: to_count(total)?,
    })
}

fn load_tags(
    connection: &mut PgConnection,
    ids: &[Uuid],
) -> QueryResult<HashMap<Uuid, Vec<String>>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = flash_message_tags::table
        .filter(flash_message_tags::message_id.eq_any(ids.to_vec()))
        .order(flash_message_tags::id.asc())
        .select((flash_message_tags::message_id, flash_message_tags::text))
        .load::<(Uuid, String)>(connection)?;

    let mut grouped: HashMap<Uuid, Vec<String>> = HashMap::new();
    for (message_id, text) in rows {
        grouped.entry(message_id).or_default().push(text);
    }
    Ok(grouped)
}

fn to_new_row(message: &FlashMessage) -> NewMessageRow {
    let owner = message.owner();
    NewMessageRow {
        id: message.id().into_inner(),
        user_id: owner.user.map(UserId::into_inner),
        session_key: owner
            .session_key
            .as_ref()
            .map(|key| key.as_str().to_owned()),
        view: message.view().to_owned(),
        message: message.text().to_owned(),
        level: message.level().value(),
        read_at: message.read_at(),
        created_at: message.created_at(),
    }
}

fn row_to_message(row: MessageRow, tags: Vec<String>) -> FlashRepositoryResult<FlashMessage> {
    let MessageRow {
        id,
        user_id,
        session_key,
        view,
        message,
        level,
        read_at,
        created_at,
    } = row;

    let session_key = session_key
        .map(SessionKey::new)
        .transpose()
        .map_err(FlashRepositoryError::persistence)?;

    Ok(FlashMessage::from_persisted(PersistedFlashMessage {
        id: MessageId::from_uuid(id),
        owner: MessageOwner {
            user: user_id.map(UserId::from_uuid),
            session_key,
        },
        view,
        text: message,
        level: Level::from_value(level),
        tags,
        read_at,
        created_at,
    }))
}

fn uuids(ids: &[MessageId]) -> Vec<Uuid> {
    ids.iter().map(|id| id.into_inner()).collect()
}

fn to_count(value: i64) -> FlashRepositoryResult<u64> {
    u64::try_from(value).map_err(FlashRepositoryError::persistence)
}

/// Builds an `ILIKE` pattern matching `needle` anywhere, with `LIKE`
/// metacharacters escaped.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
