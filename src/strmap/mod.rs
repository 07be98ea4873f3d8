/// Sorted string-keyed map for static path segments.
#[derive(Debug, Default)]
pub struct StrMap<T> {
    keys: Vec<Box<str>>,
    values: Vec<T>,
}

impl<T> StrMap<T> {
    pub fn new() -> Self {
        Self {
            keys: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn find(&self, key: &str) -> Option<&T> {
        let i = self.find_index(key).ok()?;
        self.values.get(i)
    }

    pub fn find_mut_with(&mut self, key: &str, f: impl FnOnce() -> T) -> &mut T {
        let i = match self.find_index(key) {
            Ok(i) => i,
            Err(i) => {
                self.values.insert(i, f());
                self.keys.insert(i, key.into());
                i
            }
        };
        &mut self.values[i]
    }

    fn find_index(&self, key: &str) -> Result<usize, usize> {
        self.keys.binary_search_by(|k| (**k).cmp(key))
    }
}
