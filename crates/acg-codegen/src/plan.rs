//! Emission planning: from parsed services to an ordered instruction list.
//!
//! The plan is built in five passes whose order is the core correctness
//! guarantee of the generator:
//!
//! 1. classes, one per distinct segment (first occurrence wins)
//! 2. property links between adjacent segments of every path
//! 3. request methods on each service's leaf class
//! 4. the root client class and one link per distinct top-level segment
//! 5. the singleton assignment
//!
//! Every class is therefore defined before anything refers to it.
//!
//! # Examples
//!
//! ```
//! use acg_codegen::plan::{ClassHierarchyBuilder, InstructionKind};
//! use acg_codegen::spec::ServiceSpec;
//! use acg_core::ServiceEntry;
//!
//! let entries = vec![
//!     ServiceEntry {
//!         path: "users.profile".to_string(),
//!         url: "/users/profile".to_string(),
//!         endpoints: "get:GET".to_string(),
//!     },
//!     ServiceEntry {
//!         path: "users.settings".to_string(),
//!         url: "/users/settings".to_string(),
//!         endpoints: "get:GET".to_string(),
//!     },
//! ];
//! let specs = ServiceSpec::parse_all(&entries).unwrap();
//!
//! let plan = ClassHierarchyBuilder::new("https://x/", "demo").build(&specs).unwrap();
//! assert_eq!(plan.count(InstructionKind::DefineClass), 3);
//! assert_eq!(plan.count(InstructionKind::LinkProperty), 2);
//! assert!(plan.first_dangling_reference().is_none());
//! ```

use crate::naming::{class_name, root_client_class, singleton_name};
use crate::spec::ServiceSpec;
use acg_core::{Error, Result};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// One source-generation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Instruction {
    /// Define a class for a path segment.
    DefineClass {
        /// Generated class name
        class: String,
    },
    /// Attach an instance of `target` to `class` as attribute `property`.
    LinkProperty {
        /// Owning class
        class: String,
        /// Attribute name (the child segment)
        property: String,
        /// Class of the attached instance
        target: String,
    },
    /// Attach a request method to a leaf class.
    DefineRequest {
        /// Leaf class receiving the method
        class: String,
        /// Method name
        method: String,
        /// Opaque transport verb
        verb: String,
        /// Full request URL
        url: String,
    },
    /// Define the root client class.
    DefineRootClient {
        /// Root client class name
        class: String,
    },
    /// Attach a top-level segment to the root client class.
    LinkRootProperty {
        /// Root client class name
        class: String,
        /// Attribute name (the top-level segment)
        property: String,
        /// Class of the attached instance
        target: String,
    },
    /// Bind the module-level singleton to a root client instance.
    AssignSingleton {
        /// Singleton variable name
        object: String,
        /// Root client class name
        class: String,
    },
}

/// Discriminant of [`Instruction`], used for counting and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstructionKind {
    /// [`Instruction::DefineClass`]
    DefineClass,
    /// [`Instruction::LinkProperty`]
    LinkProperty,
    /// [`Instruction::DefineRequest`]
    DefineRequest,
    /// [`Instruction::DefineRootClient`]
    DefineRootClient,
    /// [`Instruction::LinkRootProperty`]
    LinkRootProperty,
    /// [`Instruction::AssignSingleton`]
    AssignSingleton,
}

impl Instruction {
    /// Returns the instruction's kind.
    #[must_use]
    pub const fn kind(&self) -> InstructionKind {
        match self {
            Self::DefineClass { .. } => InstructionKind::DefineClass,
            Self::LinkProperty { .. } => InstructionKind::LinkProperty,
            Self::DefineRequest { .. } => InstructionKind::DefineRequest,
            Self::DefineRootClient { .. } => InstructionKind::DefineRootClient,
            Self::LinkRootProperty { .. } => InstructionKind::LinkRootProperty,
            Self::AssignSingleton { .. } => InstructionKind::AssignSingleton,
        }
    }

    /// Class this instruction defines, if any.
    #[must_use]
    pub fn defined_class(&self) -> Option<&str> {
        match self {
            Self::DefineClass { class } | Self::DefineRootClient { class } => {
                Some(class.as_str())
            }
            _ => None,
        }
    }

    /// Classes that must already be defined when this instruction runs.
    #[must_use]
    pub fn referenced_classes(&self) -> Vec<&str> {
        match self {
            Self::DefineClass { .. } | Self::DefineRootClient { .. } => Vec::new(),
            Self::LinkProperty { class, target, .. }
            | Self::LinkRootProperty { class, target, .. } => {
                vec![class.as_str(), target.as_str()]
            }
            Self::DefineRequest { class, .. } | Self::AssignSingleton { class, .. } => {
                vec![class.as_str()]
            }
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DefineClass { class } => write!(f, "class {class}"),
            Self::LinkProperty {
                class,
                property,
                target,
            }
            | Self::LinkRootProperty {
                class,
                property,
                target,
            } => write!(f, "{class}.{property} -> {target}"),
            Self::DefineRequest {
                class,
                method,
                verb,
                url,
            } => write!(f, "{class}.{method}() {verb} {url}"),
            Self::DefineRootClient { class } => write!(f, "root class {class}"),
            Self::AssignSingleton { object, class } => write!(f, "{object} = {class}()"),
        }
    }
}

/// Ordered, read-only list of emission instructions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EmissionPlan {
    instructions: Vec<Instruction>,
}

impl EmissionPlan {
    /// Instructions in emission order.
    #[must_use]
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Iterates instructions in emission order.
    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.iter()
    }

    /// Total number of instructions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns `true` if the plan has no instructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Number of instructions of the given kind.
    #[must_use]
    pub fn count(&self, kind: InstructionKind) -> usize {
        self.iter().filter(|i| i.kind() == kind).count()
    }

    /// Instructions of the given kind, in order.
    pub fn of_kind(&self, kind: InstructionKind) -> impl Iterator<Item = &Instruction> {
        self.iter().filter(move |i| i.kind() == kind)
    }

    /// Finds the first instruction that refers to a class not defined
    /// earlier in the plan. `None` means the plan is well ordered.
    #[must_use]
    pub fn first_dangling_reference(&self) -> Option<&Instruction> {
        let mut defined = HashSet::new();
        for instruction in &self.instructions {
            if instruction
                .referenced_classes()
                .iter()
                .any(|class| !defined.contains(class))
            {
                return Some(instruction);
            }
            if let Some(class) = instruction.defined_class() {
                defined.insert(class);
            }
        }
        None
    }
}

impl From<Vec<Instruction>> for EmissionPlan {
    fn from(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }
}

/// Segments already promoted to classes, in first-seen order.
///
/// Also remembers which segment claimed each class name so two segments
/// that capitalize to the same name are caught.
#[derive(Debug, Default)]
pub struct SeenClasses {
    order: Vec<String>,
    segments: HashSet<String>,
    owners: HashMap<String, String>,
}

impl SeenClasses {
    /// Records `segment`. Returns `Ok(true)` the first time a segment is
    /// seen and `Ok(false)` for repeats.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClassNameCollision`] if a different segment already
    /// produced the same class name.
    pub fn insert(&mut self, segment: &str) -> Result<bool> {
        if self.segments.contains(segment) {
            return Ok(false);
        }

        let class = class_name(segment);
        if let Some(owner) = self.owners.get(&class) {
            return Err(Error::ClassNameCollision {
                class,
                first: owner.clone(),
                second: segment.to_string(),
            });
        }

        self.owners.insert(class, segment.to_string());
        self.segments.insert(segment.to_string());
        self.order.push(segment.to_string());
        Ok(true)
    }

    /// Returns `true` if `segment` was recorded.
    #[must_use]
    pub fn contains(&self, segment: &str) -> bool {
        self.segments.contains(segment)
    }

    /// Segment that owns `class`, if any.
    #[must_use]
    pub fn owner_of(&self, class: &str) -> Option<&str> {
        self.owners.get(class).map(String::as_str)
    }

    /// Recorded segments in first-seen order.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.order
    }
}

/// Builds an [`EmissionPlan`] from parsed services.
#[derive(Debug)]
pub struct ClassHierarchyBuilder {
    api_url: String,
    package: String,
    seen: SeenClasses,
    instructions: Vec<Instruction>,
}

impl ClassHierarchyBuilder {
    /// Creates a builder for one generation run.
    #[must_use]
    pub fn new(api_url: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            package: package.into(),
            seen: SeenClasses::default(),
            instructions: Vec::new(),
        }
    }

    /// Runs all five passes over `specs` (in declaration order).
    ///
    /// # Errors
    ///
    /// Returns:
    /// - [`Error::ClassNameCollision`] if two segments, or a segment and the
    ///   root client, share a class name
    /// - [`Error::DuplicateEndpoint`] if two services with the same leaf
    ///   segment declare the same method name
    pub fn build(mut self, specs: &[ServiceSpec]) -> Result<EmissionPlan> {
        self.class_pass(specs)?;
        self.property_pass(specs);
        self.endpoint_pass(specs)?;
        self.root_pass(specs)?;
        self.singleton_pass();

        tracing::debug!(
            "Built emission plan with {} instructions ({} classes)",
            self.instructions.len(),
            self.seen.segments().len()
        );

        Ok(EmissionPlan {
            instructions: self.instructions,
        })
    }

    fn class_pass(&mut self, specs: &[ServiceSpec]) -> Result<()> {
        for spec in specs {
            for segment in spec.segments() {
                if self.seen.insert(segment)? {
                    self.instructions.push(Instruction::DefineClass {
                        class: class_name(segment),
                    });
                } else {
                    tracing::trace!("Skipping already defined class for '{segment}'");
                }
            }
        }
        Ok(())
    }

    /// Repeated pairs are emitted again; reassigning the same attribute is
    /// harmless in the generated source.
    fn property_pass(&mut self, specs: &[ServiceSpec]) {
        for spec in specs {
            for pair in spec.segments().windows(2) {
                self.instructions.push(Instruction::LinkProperty {
                    class: class_name(&pair[0]),
                    property: pair[1].clone(),
                    target: class_name(&pair[1]),
                });
            }
        }
    }

    fn endpoint_pass(&mut self, specs: &[ServiceSpec]) -> Result<()> {
        let mut methods: HashSet<(String, String)> = HashSet::new();

        for spec in specs {
            let class = class_name(spec.leaf());
            let url = format!("{}{}", self.api_url, spec.url());

            for endpoint in spec.endpoints().iter() {
                if !methods.insert((class.clone(), endpoint.name.clone())) {
                    return Err(Error::DuplicateEndpoint {
                        service: spec.path().to_string(),
                        endpoint: endpoint.name.clone(),
                    });
                }

                self.instructions.push(Instruction::DefineRequest {
                    class: class.clone(),
                    method: endpoint.name.clone(),
                    verb: endpoint.verb.clone(),
                    url: url.clone(),
                });
            }
        }
        Ok(())
    }

    /// Top-level segments shared by several paths are linked once.
    fn root_pass(&mut self, specs: &[ServiceSpec]) -> Result<()> {
        let root = root_client_class(&self.package);
        if let Some(segment) = self.seen.owner_of(&root) {
            return Err(Error::ClassNameCollision {
                class: root,
                first: segment.to_string(),
                second: format!("package '{}'", self.package),
            });
        }

        self.instructions
            .push(Instruction::DefineRootClient { class: root.clone() });

        let mut linked = HashSet::new();
        for spec in specs {
            let first = spec.root();
            if linked.insert(first) {
                self.instructions.push(Instruction::LinkRootProperty {
                    class: root.clone(),
                    property: first.to_string(),
                    target: class_name(first),
                });
            }
        }
        Ok(())
    }

    fn singleton_pass(&mut self) {
        self.instructions.push(Instruction::AssignSingleton {
            object: singleton_name(&self.package),
            class: root_client_class(&self.package),
        });
    }
}
