//! [`SqliteLedger`] — a [`ContactLedger`] bound to one open connection or
//! transaction.

use rusqlite::OptionalExtension as _;
use weft_core::{
  contact::{Contact, ContactId, LinkPrecedence, NewContact},
  ledger::ContactLedger,
};

use crate::{
  Error, Result,
  encode::{CONTACT_COLUMNS, RawContact, encode_dt, encode_precedence, now},
};

/// Borrowed view of the `contacts` table. Pass a [`rusqlite::Transaction`]
/// to make a sequence of calls all-or-nothing.
pub struct SqliteLedger<'a> {
  conn: &'a rusqlite::Connection,
}

impl<'a> SqliteLedger<'a> {
  pub fn new(conn: &'a rusqlite::Connection) -> Self { Self { conn } }

  /// Fetch one row by id, tombstoned or not.
  pub fn get(&self, id: ContactId) -> Result<Option<Contact>> {
    let sql = format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?1");
    let raw = self
      .conn
      .query_row(&sql, rusqlite::params![id], RawContact::from_row)
      .optional()?;
    raw.map(RawContact::into_contact).transpose()
  }

  /// Every row in id order.
  pub fn list(&self, include_deleted: bool) -> Result<Vec<Contact>> {
    let filter = if include_deleted { "" } else { "WHERE deleted_at IS NULL" };
    let sql = format!("SELECT {CONTACT_COLUMNS} FROM contacts {filter} ORDER BY id");
    self.query(&sql, rusqlite::params![])
  }

  /// Number of live secondaries linked to `id`.
  pub fn count_secondaries(&self, id: ContactId) -> Result<usize> {
    let n: i64 = self.conn.query_row(
      "SELECT COUNT(*) FROM contacts WHERE linked_id = ?1 AND deleted_at IS NULL",
      rusqlite::params![id],
      |r| r.get(0),
    )?;
    Ok(n as usize)
  }

  /// Stamp `deleted_at` and `updated_at` on a live row.
  pub fn tombstone(&self, id: ContactId) -> Result<Contact> {
    let at = encode_dt(now());
    let changed = self.conn.execute(
      "UPDATE contacts SET deleted_at = ?2, updated_at = ?2
       WHERE id = ?1 AND deleted_at IS NULL",
      rusqlite::params![id, at],
    )?;
    if changed == 0 {
      return Err(Error::ContactNotFound(id));
    }
    self.get(id)?.ok_or(Error::ContactNotFound(id))
  }

  fn query(&self, sql: &str, params: &[&dyn rusqlite::ToSql]) -> Result<Vec<Contact>> {
    let mut stmt = self.conn.prepare(sql)?;
    let raws = stmt
      .query_map(params, RawContact::from_row)?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    raws.into_iter().map(RawContact::into_contact).collect()
  }
}

impl ContactLedger for SqliteLedger<'_> {
  type Error = Error;

  fn find_by_attributes(
    &mut self,
    email: Option<&str>,
    phone: Option<&str>,
  ) -> Result<Vec<Contact>> {
    if email.is_none() && phone.is_none() {
      return Ok(Vec::new());
    }
    // `col = NULL` is never true, so an absent predicate simply drops out.
    let sql = format!(
      "SELECT {CONTACT_COLUMNS} FROM contacts
       WHERE deleted_at IS NULL AND (email = ?1 OR phone_number = ?2)
       ORDER BY created_at, id"
    );
    self.query(&sql, rusqlite::params![email, phone])
  }

  fn find_cluster(&mut self, contact_id: ContactId) -> Result<Vec<Contact>> {
    let root: Option<ContactId> = self
      .conn
      .query_row(
        "SELECT COALESCE(linked_id, id) FROM contacts WHERE id = ?1",
        rusqlite::params![contact_id],
        |r| r.get(0),
      )
      .optional()?;
    let Some(root) = root else {
      return Ok(Vec::new());
    };

    let sql = format!(
      "SELECT {CONTACT_COLUMNS} FROM contacts
       WHERE deleted_at IS NULL AND (id = ?1 OR linked_id = ?1)
       ORDER BY created_at, id"
    );
    self.query(&sql, rusqlite::params![root])
  }

  fn insert(&mut self, contact: NewContact) -> Result<Contact> {
    let at = now();
    let at_str = encode_dt(at);
    self.conn.execute(
      "INSERT INTO contacts (
         email, phone_number, linked_id, link_precedence, created_at, updated_at
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
      rusqlite::params![
        contact.email,
        contact.phone_number,
        contact.linked_id,
        encode_precedence(contact.link_precedence),
        at_str,
      ],
    )?;

    Ok(Contact {
      id:              self.conn.last_insert_rowid(),
      email:           contact.email,
      phone_number:    contact.phone_number,
      linked_id:       contact.linked_id,
      link_precedence: contact.link_precedence,
      created_at:      at,
      updated_at:      at,
      deleted_at:      None,
    })
  }

  fn demote(&mut self, contact_id: ContactId, linked_id: ContactId) -> Result<Contact> {
    if contact_id == linked_id {
      return Err(Error::SelfLink(contact_id));
    }
    let changed = self.conn.execute(
      "UPDATE contacts SET link_precedence = ?2, linked_id = ?3, updated_at = ?4
       WHERE id = ?1",
      rusqlite::params![
        contact_id,
        encode_precedence(LinkPrecedence::Secondary),
        linked_id,
        encode_dt(now()),
      ],
    )?;
    if changed == 0 {
      return Err(Error::ContactNotFound(contact_id));
    }
    self.get(contact_id)?.ok_or(Error::ContactNotFound(contact_id))
  }
}
