//! Families and their members.

use std::collections::{BTreeSet, HashMap};

use crate::document::{FamilyEntry, Ordered, Template};
use crate::error::ConfigError;

/// A family sharing the residence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Family {
    pub name: String,
    pub members: Vec<String>,
    /// Line template used for this family in billed reports.
    pub template: Option<Template>,
}

/// Validated roster. Declaration order is display order.
#[derive(Debug, Clone)]
pub struct Roster {
    families: Vec<Family>,
    family_index: HashMap<String, usize>,
    member_family: HashMap<String, usize>,
}

impl Roster {
    /// Validates families; every member must belong to exactly one family.
    pub fn new(families: Vec<Family>) -> Result<Self, ConfigError> {
        let mut family_index = HashMap::with_capacity(families.len());
        let mut member_family: HashMap<String, usize> = HashMap::new();

        for (index, family) in families.iter().enumerate() {
            if family_index.insert(family.name.clone(), index).is_some() {
                return Err(ConfigError::DuplicateFamily {
                    family: family.name.clone(),
                });
            }
            if family.members.is_empty() {
                return Err(ConfigError::EmptyFamily {
                    family: family.name.clone(),
                });
            }
            for member in &family.members {
                if let Some(&first) = member_family.get(member) {
                    return Err(ConfigError::DuplicateMember {
                        member: member.clone(),
                        first: families[first].name.clone(),
                        second: family.name.clone(),
                    });
                }
                member_family.insert(member.clone(), index);
            }
        }

        Ok(Self {
            families,
            family_index,
            member_family,
        })
    }

    /// Builds a roster from the `families` section of a document.
    pub fn from_entries(entries: Ordered<String, FamilyEntry>) -> Result<Self, ConfigError> {
        let families = entries
            .0
            .into_iter()
            .map(|(name, entry)| Family {
                name,
                members: entry.persons,
                template: entry.template,
            })
            .collect();
        Self::new(families)
    }

    pub fn families(&self) -> &[Family] {
        &self.families
    }

    pub fn family(&self, name: &str) -> Option<&Family> {
        self.family_index.get(name).map(|&i| &self.families[i])
    }

    /// The family a member belongs to.
    pub fn family_of(&self, member: &str) -> Option<&Family> {
        self.member_family.get(member).map(|&i| &self.families[i])
    }

    pub fn contains(&self, member: &str) -> bool {
        self.member_family.contains_key(member)
    }

    /// Members of `present`, in roster order.
    pub fn members_in_order<'a>(
        &'a self,
        present: &'a BTreeSet<String>,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.families
            .iter()
            .flat_map(|f| f.members.iter())
            .filter(move |m| present.contains(*m))
            .map(String::as_str)
    }

    /// Names of families with at least one member in `present`, in roster order.
    pub fn families_in_order<'a>(
        &'a self,
        present: &'a BTreeSet<String>,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.families
            .iter()
            .filter(move |f| f.members.iter().any(|m| present.contains(m)))
            .map(|f| f.name.as_str())
    }
}
