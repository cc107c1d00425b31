//! Demo data seeding.
//!
//! Loads a fixed cast of five developers and eight projects so a fresh
//! deployment has something to browse. Seeding is idempotent: users are
//! matched by username and projects by title, and existing records are left
//! exactly as they are.

use std::sync::Arc;

use mockable::Clock;
use thiserror::Error;
use tracing::info;

use crate::domain::ports::{
    AccountCommand, Authenticator, IdentityRepository, IdentityRepositoryError, ProjectRepository,
    ProjectRepositoryError,
};
use crate::domain::{
    Error as DomainError, NewProject, ProfileDetails, ProfileId, ProfileValidationError,
    ProjectDraft, ProjectValidationError, Registration, RegistrationValidationError, TagList,
};

/// Shared password of every demo account.
pub const DEMO_PASSWORD: &str = "demo123";

struct DemoUser {
    username: &'static str,
    email: &'static str,
    bio: &'static str,
    skills: &'static [&'static str],
    interests: &'static [&'static str],
    availability_hours: i32,
    preferred_roles: &'static [&'static str],
}

struct DemoProject {
    title: &'static str,
    description: &'static str,
    tech_stack: &'static [&'static str],
    needed_roles: &'static [&'static str],
    /// Index into [`DEMO_USERS`].
    owner: usize,
    /// Indices into [`DEMO_USERS`]; owners are listed explicitly.
    members: &'static [usize],
}

const DEMO_USERS: &[DemoUser] = &[
    DemoUser {
        username: "alice_dev",
        email: "alice@example.com",
        bio: "Full-stack developer with 5 years of experience in React and Python. Passionate \
            about clean code and user experience.",
        skills: &["Python", "Django", "React", "JavaScript", "PostgreSQL", "Docker"],
        interests: &["Web Development", "Machine Learning", "Open Source"],
        availability_hours: 20,
        preferred_roles: &["Backend Developer", "Full-stack Developer"],
    },
    DemoUser {
        username: "bob_frontend",
        email: "bob@example.com",
        bio: "Frontend specialist focused on modern JavaScript frameworks. Love creating \
            beautiful and responsive user interfaces.",
        skills: &["React", "Vue.js", "TypeScript", "CSS", "SASS", "Webpack"],
        interests: &["UI/UX Design", "Frontend Architecture", "Performance Optimization"],
        availability_hours: 15,
        preferred_roles: &["Frontend Developer", "UI Developer"],
    },
    DemoUser {
        username: "charlie_mobile",
        email: "charlie@example.com",
        bio: "Mobile app developer specializing in React Native and Flutter. Experienced in both \
            iOS and Android development.",
        skills: &["React Native", "Flutter", "Swift", "Kotlin", "Firebase", "Redux"],
        interests: &["Mobile Development", "Cross-platform Apps", "App Store Optimization"],
        availability_hours: 25,
        preferred_roles: &["Mobile Developer", "React Native Developer"],
    },
    DemoUser {
        username: "diana_designer",
        email: "diana@example.com",
        bio: "UI/UX designer with a background in psychology. Focus on creating intuitive and \
            accessible user experiences.",
        skills: &["Figma", "Adobe XD", "Sketch", "Photoshop", "Illustrator", "Prototyping"],
        interests: &["User Research", "Accessibility", "Design Systems", "Branding"],
        availability_hours: 18,
        preferred_roles: &["UI Designer", "UX Designer", "Product Designer"],
    },
    DemoUser {
        username: "eve_devops",
        email: "eve@example.com",
        bio: "DevOps engineer with expertise in cloud infrastructure and CI/CD pipelines. \
            Passionate about automation and scalability.",
        skills: &["AWS", "Docker", "Kubernetes", "Terraform", "Jenkins", "Python"],
        interests: &["Cloud Computing", "Infrastructure as Code", "Monitoring", "Security"],
        availability_hours: 30,
        preferred_roles: &["DevOps Engineer", "Cloud Engineer", "Site Reliability Engineer"],
    },
];

const DEMO_PROJECTS: &[DemoProject] = &[
    DemoProject {
        title: "EcoTracker Mobile App",
        description: "A mobile application to help users track their carbon footprint and suggest \
            eco-friendly alternatives. Features include daily activity tracking, carbon footprint \
            calculator, and personalized recommendations for sustainable living.",
        tech_stack: &["React Native", "Firebase", "Redux", "Node.js", "MongoDB"],
        needed_roles: &["Mobile Developer", "Backend Developer", "UI Designer"],
        owner: 0,
        members: &[0, 2],
    },
    DemoProject {
        title: "DevPal Platform",
        description: "A web platform connecting developers with projects. Features include \
            project discovery, team matching, skill-based recommendations, and collaboration \
            tools. Built with modern web technologies.",
        tech_stack: &["Django", "React", "PostgreSQL", "Redis", "Docker"],
        needed_roles: &["Full-stack Developer", "Frontend Developer", "DevOps Engineer"],
        owner: 1,
        members: &[1, 0, 4],
    },
    DemoProject {
        title: "AI Recipe Generator",
        description: "An intelligent recipe generator that creates personalized recipes based on \
            available ingredients, dietary restrictions, and taste preferences. Uses machine \
            learning to suggest optimal cooking methods.",
        tech_stack: &["Python", "TensorFlow", "Django", "React", "PostgreSQL"],
        needed_roles: &["Machine Learning Engineer", "Backend Developer", "Frontend Developer"],
        owner: 0,
        members: &[0],
    },
    DemoProject {
        title: "Smart Home Dashboard",
        description: "A comprehensive dashboard for managing smart home devices. Features include \
            device control, energy monitoring, automation rules, and security alerts. Focus on \
            intuitive design and accessibility.",
        tech_stack: &["Vue.js", "Node.js", "WebSocket", "MQTT", "InfluxDB"],
        needed_roles: &["Frontend Developer", "Backend Developer", "UI Designer"],
        owner: 3,
        members: &[3, 1],
    },
    DemoProject {
        title: "Blockchain Voting System",
        description: "A secure, transparent voting system built on blockchain technology. Ensures \
            vote integrity, prevents fraud, and provides real-time results. Includes mobile app \
            for voters and web dashboard for administrators.",
        tech_stack: &["Solidity", "Web3.js", "React Native", "Node.js", "IPFS"],
        needed_roles: &["Blockchain Developer", "Mobile Developer", "Security Engineer"],
        owner: 4,
        members: &[4, 2],
    },
    DemoProject {
        title: "Fitness Tracker API",
        description: "A comprehensive API for fitness tracking applications. Provides endpoints \
            for workout logging, progress tracking, social features, and integration with \
            wearable devices. Scalable microservices architecture.",
        tech_stack: &["Python", "FastAPI", "PostgreSQL", "Redis", "Kubernetes"],
        needed_roles: &["Backend Developer", "DevOps Engineer", "API Designer"],
        owner: 0,
        members: &[0, 4],
    },
    DemoProject {
        title: "Virtual Event Platform",
        description: "A platform for hosting virtual events, conferences, and meetups. Features \
            include live streaming, chat rooms, networking tools, and event management. Built for \
            scalability and global accessibility.",
        tech_stack: &["React", "Node.js", "WebRTC", "Socket.io", "AWS"],
        needed_roles: &["Full-stack Developer", "DevOps Engineer", "UX Designer"],
        owner: 1,
        members: &[1, 3, 4],
    },
    DemoProject {
        title: "Code Review Assistant",
        description: "An AI-powered code review tool that analyzes pull requests and provides \
            intelligent suggestions for code improvements, security vulnerabilities, and best \
            practices. Integrates with popular Git platforms.",
        tech_stack: &["Python", "Machine Learning", "Django", "React", "Docker"],
        needed_roles: &["Machine Learning Engineer", "Backend Developer", "Frontend Developer"],
        owner: 0,
        members: &[0, 1],
    },
];

/// Counts reported after a seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DemoSeedOutcome {
    /// Demo users registered by this run.
    pub users_created: usize,
    /// Demo users that were already present.
    pub users_existing: usize,
    /// Demo projects created by this run.
    pub projects_created: usize,
    /// Demo projects whose title was already taken.
    pub projects_existing: usize,
}

/// Errors raised while loading demo data.
#[derive(Debug, Error)]
pub enum DemoDataError {
    /// A demo profile failed validation.
    #[error("demo profile is invalid: {0}")]
    Profile(#[from] ProfileValidationError),
    /// A demo registration failed validation.
    #[error("demo registration is invalid: {0}")]
    Registration(#[from] RegistrationValidationError),
    /// A demo project failed validation.
    #[error("demo project is invalid: {0}")]
    Project(#[from] ProjectValidationError),
    /// Registering or resolving a demo account failed.
    #[error("account operation failed: {0}")]
    Account(#[from] DomainError),
    /// Looking up an existing demo user failed.
    #[error("identity lookup failed: {0}")]
    Identity(#[from] IdentityRepositoryError),
    /// Writing a demo project or its members failed.
    #[error("project persistence failed: {0}")]
    Persistence(#[from] ProjectRepositoryError),
    /// A demo project names a user outside the demo cast.
    #[error("demo project references unknown user index {index}")]
    UnknownUser {
        /// Offending index into the cast.
        index: usize,
    },
}

/// Loads the demo cast through the account and project ports.
pub struct DemoDataSeeder {
    accounts: Arc<dyn AccountCommand>,
    auth: Arc<dyn Authenticator>,
    identities: Arc<dyn IdentityRepository>,
    projects: Arc<dyn ProjectRepository>,
    clock: Arc<dyn Clock>,
}

impl DemoDataSeeder {
    /// Wire the seeder to its ports.
    #[must_use]
    pub const fn new(
        accounts: Arc<dyn AccountCommand>,
        auth: Arc<dyn Authenticator>,
        identities: Arc<dyn IdentityRepository>,
        projects: Arc<dyn ProjectRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            accounts,
            auth,
            identities,
            projects,
            clock,
        }
    }

    /// Create any missing demo users and projects.
    ///
    /// # Errors
    /// Returns [`DemoDataError`] when a port fails. Records written before
    /// the failure stay in place; a rerun picks up where it stopped.
    pub async fn seed(&self) -> Result<DemoSeedOutcome, DemoDataError> {
        let mut outcome = DemoSeedOutcome::default();
        let mut profiles = Vec::with_capacity(DEMO_USERS.len());
        for user in DEMO_USERS {
            profiles.push(self.ensure_user(user, &mut outcome).await?);
        }
        for project in DEMO_PROJECTS {
            self.ensure_project(project, &profiles, &mut outcome).await?;
        }
        info!(
            users_created = outcome.users_created,
            projects_created = outcome.projects_created,
            "demo data loaded"
        );
        Ok(outcome)
    }

    async fn ensure_user(
        &self,
        user: &DemoUser,
        outcome: &mut DemoSeedOutcome,
    ) -> Result<ProfileId, DemoDataError> {
        if let Some(identity) = self.identities.find_by_username(user.username).await? {
            info!(username = user.username, "demo user already exists");
            outcome.users_existing += 1;
            let actor = self.auth.resolve_actor(identity.id).await?;
            return Ok(actor.profile.id);
        }

        let details = ProfileDetails::try_new(
            user.bio,
            TagList::from_items(user.skills.iter().copied()),
            TagList::from_items(user.interests.iter().copied()),
            Some(user.availability_hours),
            TagList::from_items(user.preferred_roles.iter().copied()),
        )?;
        let registration =
            Registration::try_new(user.username, Some(user.email), DEMO_PASSWORD, details)?;
        let account = self.accounts.register(registration).await?;
        info!(username = user.username, "created demo user");
        outcome.users_created += 1;
        Ok(account.profile.id)
    }

    async fn ensure_project(
        &self,
        project: &DemoProject,
        profiles: &[ProfileId],
        outcome: &mut DemoSeedOutcome,
    ) -> Result<(), DemoDataError> {
        if self.projects.find_by_title(project.title).await?.is_some() {
            info!(title = project.title, "demo project already exists");
            outcome.projects_existing += 1;
            return Ok(());
        }

        let profile_at = |index: usize| {
            profiles
                .get(index)
                .copied()
                .ok_or(DemoDataError::UnknownUser { index })
        };
        let draft = ProjectDraft::try_new(
            project.title,
            project.description,
            TagList::from_items(project.tech_stack.iter().copied()),
            TagList::from_items(project.needed_roles.iter().copied()),
        )?;
        let created = self
            .projects
            .insert(&NewProject {
                draft,
                created_by: profile_at(project.owner)?,
                created_at: self.clock.utc(),
            })
            .await?;
        for &member in project.members {
            self.projects
                .add_member(created.id, profile_at(member)?)
                .await?;
        }
        info!(title = project.title, project_id = %created.id, "created demo project");
        outcome.projects_created += 1;
        Ok(())
    }
}
