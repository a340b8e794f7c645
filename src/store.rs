use std::collections::HashMap;

use crate::customer::Customer;
use crate::errors::{LedgerError, Result};
use crate::types::CustomerId;

/// document-persistence collaborator for customer records
///
/// implementations own durability concerns (retries, transactions); the
/// ledger core only relies on this contract
pub trait CustomerStore {
    fn find_by_id(&self, id: &CustomerId) -> Result<Customer>;

    fn find_by_phone(&self, phone: &str) -> Result<Customer>;

    /// all customers, newest registration first
    fn list(&self) -> Vec<Customer>;

    /// insert or replace, enforcing phone uniqueness across customers
    fn save(&mut self, customer: Customer) -> Result<Customer>;

    /// permanently remove the customer and its embedded payments
    fn delete(&mut self, id: &CustomerId) -> Result<Customer>;
}

/// in-memory store, the reference implementation of the contract
#[derive(Debug, Default)]
pub struct MemoryStore {
    customers: HashMap<CustomerId, Customer>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }
}

impl CustomerStore for MemoryStore {
    fn find_by_id(&self, id: &CustomerId) -> Result<Customer> {
        self.customers
            .get(id)
            .cloned()
            .ok_or(LedgerError::CustomerNotFound { id: *id })
    }

    fn find_by_phone(&self, phone: &str) -> Result<Customer> {
        self.customers
            .values()
            .find(|c| c.phone == phone)
            .cloned()
            .ok_or_else(|| LedgerError::PhoneNotFound {
                phone: phone.to_string(),
            })
    }

    fn list(&self) -> Vec<Customer> {
        let mut customers: Vec<Customer> = self.customers.values().cloned().collect();
        customers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        customers
    }

    fn save(&mut self, customer: Customer) -> Result<Customer> {
        let conflict = self
            .customers
            .values()
            .any(|c| c.phone == customer.phone && c.id != customer.id);
        if conflict {
            return Err(LedgerError::DuplicatePhone {
                phone: customer.phone.clone(),
            });
        }

        self.customers.insert(customer.id, customer.clone());
        Ok(customer)
    }

    fn delete(&mut self, id: &CustomerId) -> Result<Customer> {
        self.customers
            .remove(id)
            .ok_or(LedgerError::CustomerNotFound { id: *id })
    }
}
