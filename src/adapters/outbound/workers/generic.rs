use crate::cataloging::domain::Location;
use crate::ports::outbound::{ContentResolver, Discovery, Environment, Worker, WorkerFailure};
use crate::shared::Result;
use std::io::{self, Read};

/// An opened location handed to a parser.
pub struct LocationReader {
    pub location: Location,
    reader: Box<dyn Read + Send>,
}

impl LocationReader {
    pub fn new(location: Location, reader: Box<dyn Read + Send>) -> Self {
        Self { location, reader }
    }

    pub fn read_to_string(mut self) -> io::Result<String> {
        let mut content = String::new();
        self.reader.read_to_string(&mut content)?;
        Ok(content)
    }
}

impl Read for LocationReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

/// Parses one location into packages and relationships scoped to it.
pub trait Parser:
    Fn(&dyn ContentResolver, &Environment, LocationReader) -> Result<Discovery> + Send + Sync
{
}

impl<F> Parser for F where
    F: Fn(&dyn ContentResolver, &Environment, LocationReader) -> Result<Discovery> + Send + Sync
{
}

struct Binding {
    globs: Vec<String>,
    parser: Box<dyn Parser>,
}

/// GenericWorker runs parsers against every location matching their globs
///
/// A failure at one location is logged and does not stop the remaining
/// locations. The worker reports one combined error for all failed
/// locations along with everything that parsed successfully.
pub struct GenericWorker {
    name: String,
    bindings: Vec<Binding>,
}

impl GenericWorker {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bindings: Vec::new(),
        }
    }

    /// Binds `parser` to every location matching any of `globs`.
    pub fn with_parser_by_globs(mut self, parser: impl Parser + 'static, globs: &[&str]) -> Self {
        self.bindings.push(Binding {
            globs: globs.iter().map(|g| g.to_string()).collect(),
            parser: Box::new(parser),
        });
        self
    }

    fn locations(
        &self,
        resolver: &dyn ContentResolver,
        binding: &Binding,
        errors: &mut Vec<String>,
    ) -> Vec<Location> {
        let mut locations = Vec::new();
        for glob in &binding.globs {
            match resolver.files_by_glob(glob) {
                Ok(found) => locations.extend(found),
                Err(e) => {
                    tracing::warn!(
                        worker = %self.name,
                        glob = %glob,
                        error = %e,
                        "unable to list locations"
                    );
                    errors.push(format!("{}: {}", glob, e));
                }
            }
        }
        locations.sort();
        locations.dedup();
        locations
    }

    fn parse(
        &self,
        resolver: &dyn ContentResolver,
        env: &Environment,
        binding: &Binding,
        location: Location,
    ) -> Result<Discovery> {
        let reader = resolver.file_contents(&location)?;
        let mut discovery = (binding.parser)(resolver, env, LocationReader::new(location, reader))?;
        discovery.packages = discovery
            .packages
            .into_iter()
            .map(|p| {
                if p.found_by().is_empty() {
                    p.with_found_by(self.name.clone())
                } else {
                    p
                }
            })
            .collect();
        Ok(discovery)
    }
}

impl Worker for GenericWorker {
    fn name(&self) -> &str {
        &self.name
    }

    fn catalog(
        &self,
        resolver: &dyn ContentResolver,
        env: &Environment,
    ) -> std::result::Result<Discovery, WorkerFailure> {
        let mut discovery = Discovery::default();
        let mut errors = Vec::new();

        for binding in &self.bindings {
            for location in self.locations(resolver, binding, &mut errors) {
                let path = location.real_path().to_string();
                tracing::debug!(worker = %self.name, path = %path, "parsing");
                match self.parse(resolver, env, binding, location) {
                    Ok(found) => discovery.extend(found),
                    Err(e) => {
                        tracing::warn!(
                            worker = %self.name,
                            path = %path,
                            error = %e,
                            "failed to parse location"
                        );
                        errors.push(format!("{}: {}", path, e));
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(discovery)
        } else {
            Err(WorkerFailure {
                partial: discovery,
                error: anyhow::anyhow!(
                    "{} location(s) failed: {}",
                    errors.len(),
                    errors.join("; ")
                ),
            })
        }
    }
}
