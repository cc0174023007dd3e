use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::profile::ProfileOwner;
use crate::models::{Education, Experience, Profile, ProfileView, SocialLinks};
use crate::services::{parse_id, FieldErrors, ServiceError};
use crate::store::AggregateStore;

/// Payload for create-or-update of the caller's profile. `status` and
/// `skills` are required; everything else is merge-patch material.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    pub status: Option<String>,
    /// Comma-delimited, e.g. "node, react, mongo".
    pub skills: Option<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub github_username: Option<String>,
    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceInput {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationInput {
    pub school: Option<String>,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

/// Typed merge-patch over the mutable profile attributes. Only fields
/// present in the request replace existing values; absent fields are left
/// untouched, never cleared.
#[derive(Debug, Default)]
struct ProfilePatch {
    status: Option<String>,
    skills: Option<Vec<String>>,
    company: Option<String>,
    website: Option<String>,
    location: Option<String>,
    bio: Option<String>,
    github_username: Option<String>,
    social: Option<SocialLinks>,
}

impl ProfilePatch {
    fn apply(self, profile: &mut Profile) {
        if let Some(v) = self.status {
            profile.status = v;
        }
        if let Some(v) = self.skills {
            profile.skills = v;
        }
        if let Some(v) = self.company {
            profile.company = Some(v);
        }
        if let Some(v) = self.website {
            profile.website = Some(v);
        }
        if let Some(v) = self.location {
            profile.location = Some(v);
        }
        if let Some(v) = self.bio {
            profile.bio = Some(v);
        }
        if let Some(v) = self.github_username {
            profile.github_username = Some(v);
        }
        if let Some(v) = self.social {
            profile.social = v;
        }
    }
}

/// Split a comma-delimited skill list into a trimmed ordered sequence.
/// Order follows the input; blank entries (trailing commas etc.) are
/// dropped.
fn parse_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|skill| skill.trim())
        .filter(|skill| !skill.is_empty())
        .map(String::from)
        .collect()
}

pub struct ProfileService {
    store: Arc<dyn AggregateStore>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn AggregateStore>) -> Self {
        Self { store }
    }

    /// Create or update the caller's profile. Insert when no profile exists
    /// for this owner, merge-patch otherwise.
    pub async fn upsert(&self, actor: Uuid, input: ProfileInput) -> Result<Profile, ServiceError> {
        let mut errors = FieldErrors::new();
        let status = errors.require("status", input.status.as_deref()).map(String::from);
        let skills = errors.require("skills", input.skills.as_deref()).map(parse_skills);
        errors.into_result()?;

        // Both are Some once validation has passed
        let status = status.unwrap_or_default();
        let skills = skills.unwrap_or_default();

        let social = build_social(&input);
        let patch = ProfilePatch {
            status: Some(status.clone()),
            skills: Some(skills.clone()),
            company: input.company,
            website: input.website,
            location: input.location,
            bio: input.bio,
            github_username: input.github_username,
            social,
        };

        match self.store.find_profile_by_owner(actor).await? {
            Some(mut profile) => {
                patch.apply(&mut profile);
                self.store.replace_profile(&profile).await?;
                Ok(profile)
            }
            None => {
                let mut profile = Profile::new(actor, status, skills);
                patch.apply(&mut profile);
                self.store.insert_profile(&profile).await?;
                Ok(profile)
            }
        }
    }

    /// Profile owned by the caller, joined with their display fields.
    pub async fn get_own(&self, actor: Uuid) -> Result<ProfileView, ServiceError> {
        let profile = self
            .store
            .find_profile_by_owner(actor)
            .await?
            .ok_or_else(|| ServiceError::not_found("There is no profile for this user"))?;
        self.join_owner(profile).await
    }

    /// Every profile joined with user display fields, storage-default order.
    pub async fn list(&self) -> Result<Vec<ProfileView>, ServiceError> {
        let profiles = self.store.list_profiles().await?;
        let mut views = Vec::with_capacity(profiles.len());
        for profile in profiles {
            match self.store.find_user(profile.owner).await? {
                Some(user) => views.push(ProfileView {
                    profile,
                    user: ProfileOwner {
                        name: user.name,
                        avatar: user.avatar,
                    },
                }),
                None => {
                    // Orphaned profile: the owning user record is gone
                    tracing::warn!(owner = %profile.owner, "profile without user record, skipping");
                }
            }
        }
        Ok(views)
    }

    /// Public profile lookup by user id. Malformed ids and absent profiles
    /// both surface as NotFound; the log line tells them apart.
    pub async fn get_by_user(&self, raw_user_id: &str) -> Result<ProfileView, ServiceError> {
        let user_id = parse_id("profile", raw_user_id)?;
        let profile = self
            .store
            .find_profile_by_owner(user_id)
            .await?
            .ok_or_else(|| {
                tracing::info!(%user_id, "no profile for requested user");
                ServiceError::not_found("There is no profile for this user")
            })?;
        self.join_owner(profile).await
    }

    /// Delete the caller's profile and user record as one logical
    /// operation. The caller's posts are left in place; see DESIGN.md.
    pub async fn delete_account(&self, actor: Uuid) -> Result<(), ServiceError> {
        self.store.delete_profile_by_owner(actor).await?;
        self.store.delete_user(actor).await?;
        Ok(())
    }

    /// Add a work history entry at the front of the list (most recent
    /// first).
    pub async fn add_experience(
        &self,
        actor: Uuid,
        input: ExperienceInput,
    ) -> Result<Profile, ServiceError> {
        let mut errors = FieldErrors::new();
        let title = errors.require("title", input.title.as_deref()).map(String::from);
        let company = errors.require("company", input.company.as_deref()).map(String::from);
        let from = errors.require_value("from", input.from);
        errors.into_result()?;
        let Some(from) = from else {
            unreachable!("presence validated above")
        };

        let mut profile = self.owned_profile(actor).await?;
        let entry = Experience {
            id: Uuid::new_v4(),
            title: title.unwrap_or_default(),
            company: company.unwrap_or_default(),
            location: input.location,
            from,
            to: input.to,
            current: input.current,
            description: input.description,
        };
        profile.experience.insert(0, entry);
        self.store.replace_profile(&profile).await?;
        Ok(profile)
    }

    /// Remove a work history entry by its id. An id that matches no entry
    /// is NotFound, never a silent success.
    pub async fn remove_experience(
        &self,
        actor: Uuid,
        raw_entry_id: &str,
    ) -> Result<Profile, ServiceError> {
        let entry_id = parse_id("experience entry", raw_entry_id)?;
        let mut profile = self.owned_profile(actor).await?;
        let index = profile
            .experience
            .iter()
            .position(|entry| entry.id == entry_id)
            .ok_or_else(|| ServiceError::not_found("experience entry not found"))?;
        profile.experience.remove(index);
        self.store.replace_profile(&profile).await?;
        Ok(profile)
    }

    pub async fn add_education(
        &self,
        actor: Uuid,
        input: EducationInput,
    ) -> Result<Profile, ServiceError> {
        let mut errors = FieldErrors::new();
        let school = errors.require("school", input.school.as_deref()).map(String::from);
        let degree = errors.require("degree", input.degree.as_deref()).map(String::from);
        let field_of_study = errors
            .require("fieldOfStudy", input.field_of_study.as_deref())
            .map(String::from);
        let from = errors.require_value("from", input.from);
        errors.into_result()?;
        let Some(from) = from else {
            unreachable!("presence validated above")
        };

        let mut profile = self.owned_profile(actor).await?;
        let entry = Education {
            id: Uuid::new_v4(),
            school: school.unwrap_or_default(),
            degree: degree.unwrap_or_default(),
            field_of_study: field_of_study.unwrap_or_default(),
            from,
            to: input.to,
            current: input.current,
            description: input.description,
        };
        profile.education.insert(0, entry);
        self.store.replace_profile(&profile).await?;
        Ok(profile)
    }

    pub async fn remove_education(
        &self,
        actor: Uuid,
        raw_entry_id: &str,
    ) -> Result<Profile, ServiceError> {
        let entry_id = parse_id("education entry", raw_entry_id)?;
        let mut profile = self.owned_profile(actor).await?;
        let index = profile
            .education
            .iter()
            .position(|entry| entry.id == entry_id)
            .ok_or_else(|| ServiceError::not_found("education entry not found"))?;
        profile.education.remove(index);
        self.store.replace_profile(&profile).await?;
        Ok(profile)
    }

    async fn owned_profile(&self, actor: Uuid) -> Result<Profile, ServiceError> {
        self.store
            .find_profile_by_owner(actor)
            .await?
            .ok_or_else(|| ServiceError::not_found("There is no profile for this user"))
    }

    async fn join_owner(&self, profile: Profile) -> Result<ProfileView, ServiceError> {
        let user = self
            .store
            .find_user(profile.owner)
            .await?
            .ok_or_else(|| {
                tracing::warn!(owner = %profile.owner, "profile without user record");
                ServiceError::not_found("There is no profile for this user")
            })?;
        Ok(ProfileView {
            profile,
            user: ProfileOwner {
                name: user.name,
                avatar: user.avatar,
            },
        })
    }
}

/// Sparse social mapping built from only the supplied platform fields.
/// Returns None when no platform was supplied at all, so an upsert without
/// any social field leaves the existing links untouched.
fn build_social(input: &ProfileInput) -> Option<SocialLinks> {
    let social = SocialLinks {
        youtube: input.youtube.clone(),
        twitter: input.twitter.clone(),
        facebook: input.facebook.clone(),
        linkedin: input.linkedin.clone(),
        instagram: input.instagram.clone(),
    };
    if social.is_empty() {
        None
    } else {
        Some(social)
    }
}
