// src/client/list.rs

use std::collections::HashMap;

use uuid::Uuid;

use crate::models::{
    appointment::Appointment, business::Business, customer::Customer, service::Service,
    staff::Staff,
};

/// Chave de uma entrada da lista. Ids provisórios vivem num espaço próprio e
/// nunca colidem com ids do servidor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKey {
    Server(Uuid),
    Pending(u64),
}

impl EntityKey {
    pub fn is_pending(&self) -> bool {
        matches!(self, EntityKey::Pending(_))
    }
}

pub trait Keyed {
    fn id(&self) -> Uuid;

    fn key(&self) -> EntityKey {
        EntityKey::Server(self.id())
    }
}

macro_rules! keyed {
    ($($ty:ty),*) => {
        $(impl Keyed for $ty {
            fn id(&self) -> Uuid {
                self.id
            }
        })*
    };
}

keyed!(Business, Staff, Customer, Service, Appointment);

/// Mapa chave → entidade com uma ordem de exibição derivada. Toda operação
/// localiza a entrada pela chave, nunca por posição.
#[derive(Debug, Clone)]
pub struct EntityList<T> {
    order: Vec<EntityKey>,
    items: HashMap<EntityKey, T>,
}

impl<T> Default for EntityList<T> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            items: HashMap::new(),
        }
    }
}

impl<T: Clone> EntityList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Troca o conteúdo inteiro pela lista do servidor (nunca mescla).
    pub fn replace_all(&mut self, entities: Vec<T>)
    where
        T: Keyed,
    {
        self.order.clear();
        self.items.clear();
        for entity in entities {
            self.push_back(entity.key(), entity);
        }
    }

    pub fn prepend(&mut self, key: EntityKey, entity: T) {
        if self.items.insert(key, entity).is_none() {
            self.order.insert(0, key);
        }
    }

    pub fn push_back(&mut self, key: EntityKey, entity: T) {
        if self.items.insert(key, entity).is_none() {
            self.order.push(key);
        }
    }

    /// Troca a chave de uma entrada mantendo a posição. Devolve `false` se a
    /// chave antiga não está mais na lista.
    pub fn rekey(&mut self, old: EntityKey, new: EntityKey, entity: T) -> bool {
        let Some(position) = self.order.iter().position(|k| *k == old) else {
            return false;
        };
        self.items.remove(&old);
        self.order[position] = new;
        self.items.insert(new, entity);
        true
    }

    pub fn remove(&mut self, key: &EntityKey) -> Option<T> {
        let entity = self.items.remove(key)?;
        self.order.retain(|k| k != key);
        Some(entity)
    }

    pub fn get(&self, key: &EntityKey) -> Option<&T> {
        self.items.get(key)
    }

    pub fn get_mut(&mut self, key: &EntityKey) -> Option<&mut T> {
        self.items.get_mut(key)
    }

    pub fn contains(&self, key: &EntityKey) -> bool {
        self.items.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn keys(&self) -> &[EntityKey] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntityKey, &T)> {
        self.order
            .iter()
            .filter_map(|key| self.items.get(key).map(|entity| (key, entity)))
    }

    /// Entidades na ordem de exibição.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().map(|(_, entity)| entity.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys<T: Clone>(list: &EntityList<T>) -> Vec<EntityKey> {
        list.keys().to_vec()
    }

    #[test]
    fn rekey_keeps_the_position() {
        let server = EntityKey::Server(Uuid::new_v4());
        let mut list = EntityList::new();
        list.push_back(EntityKey::Pending(1), "a");
        list.push_back(EntityKey::Pending(2), "b");
        list.push_back(EntityKey::Pending(3), "c");

        assert!(list.rekey(EntityKey::Pending(2), server, "B"));
        assert_eq!(
            keys(&list),
            vec![EntityKey::Pending(1), server, EntityKey::Pending(3)]
        );
        assert_eq!(list.get(&server), Some(&"B"));
        assert!(!list.contains(&EntityKey::Pending(2)));
    }

    #[test]
    fn rekey_of_a_missing_entry_is_a_no_op() {
        let mut list = EntityList::new();
        list.push_back(EntityKey::Pending(1), 1);
        assert!(!list.rekey(EntityKey::Pending(9), EntityKey::Pending(10), 10));
        assert_eq!(list.to_vec(), vec![1]);
    }

    #[test]
    fn prepend_and_remove_track_length() {
        let mut list = EntityList::new();
        list.push_back(EntityKey::Pending(1), 1);
        list.prepend(EntityKey::Pending(2), 2);
        assert_eq!(list.to_vec(), vec![2, 1]);

        assert_eq!(list.remove(&EntityKey::Pending(1)), Some(1));
        assert_eq!(list.remove(&EntityKey::Pending(1)), None);
        assert_eq!(list.len(), 1);
    }
}
